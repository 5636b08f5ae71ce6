//! SQLite storage backend.
//!
//! Embedded single-file engine, accessed through `rusqlite` with
//! `tokio-rusqlite` moving every call onto the connection's own thread.

mod conversions;
mod error;
mod executor;

pub use executor::SqliteExecutor;
