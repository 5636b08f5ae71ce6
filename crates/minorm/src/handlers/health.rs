//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/readyz` - Readiness probe (round trip to the database)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /readyz - Readiness probe.
///
/// Runs `SELECT 1` through the shared executor. Returns 200 when the
/// database answers, 503 otherwise.
#[axum::debug_handler]
pub async fn readyz(State(state): State<AppState>) -> Response {
    let backend = state.executor.kind();

    match state.executor.fetch_one("SELECT 1", &[]).await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({ "healthy": true, "backend": backend })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(%backend, error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "healthy": false,
                    "backend": backend,
                    "error": e.to_string()
                })),
            )
                .into_response()
        }
    }
}
