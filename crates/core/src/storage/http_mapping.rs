//! Pure functions for mapping mapper errors to HTTP status codes.
//!
//! The core never sees HTTP types; the web layer calls this to pick a status.

use super::OrmError;

/// Maps an [`OrmError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `InvalidData` -> 400 (Bad Request)
/// - `UnsupportedBackend` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use minorm_core::storage::{error_to_status_code, OrmError};
///
/// let error = OrmError::NotFound {
///     table: "users".to_string(),
///     id: "1".to_string(),
/// };
/// assert_eq!(error_to_status_code(&error), 404);
/// ```
pub fn error_to_status_code(error: &OrmError) -> u16 {
    match error {
        OrmError::NotFound { .. } => 404,
        OrmError::ConnectionFailed(_) => 503,
        OrmError::QueryFailed(_) => 500,
        OrmError::InvalidData(_) => 400,
        OrmError::UnsupportedBackend(_) => 500,
    }
}
