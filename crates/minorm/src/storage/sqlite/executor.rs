//! SQLite query executor.
//!
//! Implements `QueryExecutor` using `rusqlite` for synchronous operations
//! and `tokio-rusqlite` for async wrapping. All statements run on the
//! connection's dedicated thread, one at a time.

use async_trait::async_trait;
use serde_json::Value;
use tokio_rusqlite::Connection;

use minorm_core::storage::{BackendKind, MutateResult, OrmError, QueryExecutor, Result, Row};

use super::conversions::{json_to_sql, row_to_record};
use super::error::map_tokio_rusqlite_error;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Whether `stmt` is an INSERT, the only statement that assigns an identity.
fn is_insert(stmt: &str) -> bool {
    stmt.trim_start()
        .get(..6)
        .is_some_and(|keyword| keyword.eq_ignore_ascii_case("insert"))
}

/// Runs a query and collects every row.
fn query_rows(
    conn: &rusqlite::Connection,
    stmt: &str,
    args: Vec<rusqlite::types::Value>,
    limit: Option<usize>,
) -> rusqlite::Result<Vec<Row>> {
    let mut prepared = conn.prepare(stmt)?;
    let columns: Vec<String> = prepared
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = prepared.query(rusqlite::params_from_iter(args))?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(row_to_record(row, &columns)?);
        if limit.is_some_and(|limit| records.len() >= limit) {
            break;
        }
    }
    Ok(records)
}

/// SQLite-backed executor.
///
/// Wraps a single `tokio_rusqlite::Connection`; clones share the same
/// underlying database.
#[derive(Clone)]
pub struct SqliteExecutor {
    conn: Connection,
}

impl std::fmt::Debug for SqliteExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteExecutor").finish_non_exhaustive()
    }
}

impl SqliteExecutor {
    /// Opens a file-based database, creating the file if it doesn't exist.
    ///
    /// `:memory:` opens a private in-memory database instead.
    pub async fn open(path: &str) -> Result<Self> {
        if path == ":memory:" {
            return Self::open_in_memory().await;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| OrmError::ConnectionFailed(e.to_string()))?;

        tracing::info!(path, "Opened SQLite database");
        Ok(Self { conn })
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing - data is lost when the last clone is dropped.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| OrmError::ConnectionFailed(e.to_string()))?;

        Ok(Self { conn })
    }

    async fn fetch(&self, stmt: &str, args: &[Value], limit: Option<usize>) -> Result<Vec<Row>> {
        let sql = stmt.to_string();
        let params: Vec<_> = args.iter().map(json_to_sql).collect();

        tracing::debug!(stmt = %sql, args = params.len(), "sqlite fetch");

        self.conn
            .call(move |conn| query_rows(conn, &sql, params, limit).map_err(wrap_err))
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    async fn mutate(&self, stmt: &str, args: &[Value]) -> Result<MutateResult> {
        let sql = stmt.to_string();
        let params: Vec<_> = args.iter().map(json_to_sql).collect();
        let insert = is_insert(stmt);

        tracing::debug!(stmt = %sql, args = params.len(), "sqlite mutate");

        self.conn
            .call(move |conn| {
                let changes = conn
                    .execute(&sql, rusqlite::params_from_iter(params))
                    .map_err(wrap_err)?;
                Ok(MutateResult {
                    inserted_id: insert.then(|| conn.last_insert_rowid()),
                    affected_count: changes as u64,
                })
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn fetch_many(&self, stmt: &str, args: &[Value]) -> Result<Vec<Row>> {
        self.fetch(stmt, args, None).await
    }

    async fn fetch_one(&self, stmt: &str, args: &[Value]) -> Result<Option<Row>> {
        Ok(self.fetch(stmt, args, Some(1)).await?.into_iter().next())
    }
}
