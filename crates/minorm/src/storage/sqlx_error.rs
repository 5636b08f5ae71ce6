//! sqlx error mapping shared by the MySQL and PostgreSQL backends.

use minorm_core::storage::OrmError;

/// Maps a sqlx error to an OrmError.
///
/// # Error Mapping
///
/// - Transport, TLS, pool and configuration failures → `OrmError::ConnectionFailed`
/// - Column decoding failures → `OrmError::InvalidData`
/// - Database errors (syntax, constraints, unknown columns) → `OrmError::QueryFailed`
///   carrying the server's message
pub fn map_sqlx_error(err: sqlx::Error) -> OrmError {
    match &err {
        sqlx::Error::Configuration(_)
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => OrmError::ConnectionFailed(err.to_string()),

        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            OrmError::InvalidData(err.to_string())
        }

        sqlx::Error::Database(db_err) => OrmError::QueryFailed(db_err.message().to_string()),

        _ => OrmError::QueryFailed(err.to_string()),
    }
}
