//! Storage backend implementations.
//!
//! This module provides concrete implementations of the [`QueryExecutor`]
//! trait defined in `minorm_core::storage`. Each backend sits behind its own
//! cargo feature; any combination may be compiled in and the active one is
//! chosen at runtime from [`DatabaseConfig`].
//!
//! # Feature Flags
//!
//! - `sqlite`: embedded engine using `rusqlite` and `tokio-rusqlite`
//! - `mysql`: MySQL pool using `sqlx`
//! - `postgres`: PostgreSQL pool using `sqlx`
//!
//! # Examples
//!
//! Build with SQLite only:
//! ```bash
//! cargo build -p minorm --no-default-features --features sqlite
//! ```

use std::sync::Arc;

use minorm_core::storage::{DatabaseConfig, QueryExecutor, Result};

#[cfg(not(any(feature = "sqlite", feature = "mysql", feature = "postgres")))]
compile_error!(
    "No storage backend selected. Enable at least one of 'sqlite', 'mysql' or 'postgres'. \
    Example: cargo build -p minorm --features sqlite"
);

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "mysql")]
pub mod mysql;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(any(feature = "mysql", feature = "postgres"))]
mod sqlx_error;

/// Opens the backend named by `config`.
///
/// SQLite opens its file immediately. The client-server pools connect on
/// first use, so an unreachable server shows up as
/// `OrmError::ConnectionFailed` from the first statement.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn QueryExecutor>> {
    tracing::info!(backend = %config.kind(), "Connecting to database");

    match config {
        #[cfg(feature = "sqlite")]
        DatabaseConfig::Sqlite { path } => {
            let executor = sqlite::SqliteExecutor::open(path).await?;
            Ok(Arc::new(executor))
        }
        #[cfg(feature = "mysql")]
        DatabaseConfig::MySql(server) => Ok(Arc::new(mysql::MySqlExecutor::connect_lazy(server))),
        #[cfg(feature = "postgres")]
        DatabaseConfig::Postgres(server) => {
            Ok(Arc::new(postgres::PostgresExecutor::connect_lazy(server)))
        }
        #[allow(unreachable_patterns)]
        other => Err(minorm_core::storage::OrmError::UnsupportedBackend(
            other.kind(),
        )),
    }
}
