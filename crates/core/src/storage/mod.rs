mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{OrmError, Result};
pub use http_mapping::error_to_status_code;
pub use traits::QueryExecutor;
pub use types::{BackendKind, DatabaseConfig, MutateResult, Row, ServerConfig};
