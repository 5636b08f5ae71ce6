//! PostgreSQL storage backend.
//!
//! Client-server engine reached through a `sqlx` connection pool. `?`
//! placeholders are renumbered to `$n` before a statement is sent.

mod conversions;
mod executor;
mod placeholders;

pub use executor::PostgresExecutor;
