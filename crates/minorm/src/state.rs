//! Shared application state.
//!
//! Everything in here is built once at startup and then only read, so the
//! state is cheap to clone into every request handler.

use std::sync::Arc;

use minorm_core::storage::QueryExecutor;

use crate::models::Models;

#[derive(Clone)]
pub struct AppState {
    /// Executor the mappers were wired with; also used by readiness checks.
    pub executor: Arc<dyn QueryExecutor>,
    pub models: Arc<Models>,
}

impl AppState {
    pub fn new(executor: Arc<dyn QueryExecutor>, models: Models) -> Self {
        Self {
            executor,
            models: Arc::new(models),
        }
    }
}
