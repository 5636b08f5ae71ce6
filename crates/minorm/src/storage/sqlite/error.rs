//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `OrmError` from
//! `minorm_core::storage`. Statement errors keep the engine's message text.

use minorm_core::storage::OrmError;

/// Maps a rusqlite error to an OrmError.
///
/// # Error Mapping
///
/// - `CannotOpen` / `NotADatabase` → `OrmError::ConnectionFailed`
/// - Type conversion failures → `OrmError::InvalidData`
/// - All other errors → `OrmError::QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error) -> OrmError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if matches!(
                sqlite_err.code,
                rusqlite::ErrorCode::CannotOpen | rusqlite::ErrorCode::NotADatabase
            ) =>
        {
            OrmError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..)
        | rusqlite::Error::InvalidColumnType(..) => OrmError::InvalidData(err.to_string()),

        _ => OrmError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to an OrmError.
///
/// This is the main entry point for error mapping in async code.
pub fn map_tokio_rusqlite_error(err: tokio_rusqlite::Error) -> OrmError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => map_rusqlite_error(rusqlite_err),
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            OrmError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => OrmError::QueryFailed(err.to_string()),
    }
}
