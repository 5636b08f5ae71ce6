//! MySQL storage backend.
//!
//! Client-server engine reached through a `sqlx` connection pool. MySQL
//! accepts `?` placeholders natively, so statements pass through unchanged.

mod conversions;
mod executor;

pub use executor::MySqlExecutor;
