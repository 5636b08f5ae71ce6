//! MySQL query executor backed by a lazily-connecting sqlx pool.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use minorm_core::storage::{BackendKind, MutateResult, QueryExecutor, Result, Row, ServerConfig};

use super::conversions::{bind_args, row_to_record};
use crate::storage::sqlx_error::map_sqlx_error;

/// Default maximum connections in the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default connection timeout.
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// MySQL-backed executor.
#[derive(Clone)]
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl std::fmt::Debug for MySqlExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlExecutor").finish_non_exhaustive()
    }
}

impl MySqlExecutor {
    /// Creates the pool without connecting.
    ///
    /// Connection problems surface through the first executed statement.
    pub fn connect_lazy(config: &ServerConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .acquire_timeout(DEFAULT_ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Configured MySQL pool"
        );
        Self { pool }
    }
}

#[async_trait]
impl QueryExecutor for MySqlExecutor {
    fn kind(&self) -> BackendKind {
        BackendKind::MySql
    }

    async fn mutate(&self, stmt: &str, args: &[Value]) -> Result<MutateResult> {
        tracing::debug!(stmt, args = args.len(), "mysql mutate");

        let result = bind_args(sqlx::query(stmt), args)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        // LAST_INSERT_ID() is 0 when the statement generated no identity.
        let inserted_id = i64::try_from(result.last_insert_id())
            .ok()
            .filter(|id| *id != 0);

        Ok(MutateResult {
            inserted_id,
            affected_count: result.rows_affected(),
        })
    }

    async fn fetch_many(&self, stmt: &str, args: &[Value]) -> Result<Vec<Row>> {
        tracing::debug!(stmt, args = args.len(), "mysql fetch");

        let rows = bind_args(sqlx::query(stmt), args)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_record).collect()
    }

    async fn fetch_one(&self, stmt: &str, args: &[Value]) -> Result<Option<Row>> {
        tracing::debug!(stmt, args = args.len(), "mysql fetch one");

        let row = bind_args(sqlx::query(stmt), args)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }
}
