//! PostgreSQL query executor backed by a lazily-connecting sqlx pool.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use minorm_core::storage::{BackendKind, MutateResult, QueryExecutor, Result, Row, ServerConfig};

use super::conversions::{bind_args, row_to_record};
use super::placeholders::number_placeholders;
use crate::storage::sqlx_error::map_sqlx_error;

/// Default maximum connections in the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default connection timeout.
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// PostgreSQL-backed executor.
///
/// The wire protocol reports no generated identity for INSERT, so
/// [`MutateResult::inserted_id`] is always `None` here.
#[derive(Clone)]
pub struct PostgresExecutor {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresExecutor").finish_non_exhaustive()
    }
}

impl PostgresExecutor {
    /// Creates the pool without connecting.
    ///
    /// Connection problems surface through the first executed statement.
    pub fn connect_lazy(config: &ServerConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .acquire_timeout(DEFAULT_ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Configured PostgreSQL pool"
        );
        Self { pool }
    }
}

#[async_trait]
impl QueryExecutor for PostgresExecutor {
    fn kind(&self) -> BackendKind {
        BackendKind::Postgres
    }

    async fn mutate(&self, stmt: &str, args: &[Value]) -> Result<MutateResult> {
        let sql = number_placeholders(stmt);
        tracing::debug!(stmt = %sql, args = args.len(), "postgres mutate");

        let result = bind_args(sqlx::query(&sql), args)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(MutateResult {
            inserted_id: None,
            affected_count: result.rows_affected(),
        })
    }

    async fn fetch_many(&self, stmt: &str, args: &[Value]) -> Result<Vec<Row>> {
        let sql = number_placeholders(stmt);
        tracing::debug!(stmt = %sql, args = args.len(), "postgres fetch");

        let rows = bind_args(sqlx::query(&sql), args)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_record).collect()
    }

    async fn fetch_one(&self, stmt: &str, args: &[Value]) -> Result<Option<Row>> {
        let sql = number_placeholders(stmt);
        tracing::debug!(stmt = %sql, args = args.len(), "postgres fetch one");

        let row = bind_args(sqlx::query(&sql), args)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }
}
