use thiserror::Error;

use super::BackendKind;

/// Errors that can occur while executing statements or mapping rows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrmError {
    #[error("{table} not found: {id}")]
    NotFound { table: String, id: String },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Backend not enabled in this build: {0}")]
    UnsupportedBackend(BackendKind),
}

/// Result type for executor and mapper operations.
pub type Result<T> = std::result::Result<T, OrmError>;
