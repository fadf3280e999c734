//! Health check handlers.
//!
//! `/health` and `/_readiness` ping the backend; `/_liveness` only proves the
//! process answers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # Response
///
/// - `200 OK` - Backend reachable
/// - `503 Service Unavailable` - Backend health check failed
pub async fn health_handler(State(state): State<AppState>) -> Response {
    debug!("Processing health check request");

    let backend = state.registry().backend_kind().to_string();
    let timestamp = chrono::Utc::now().to_rfc3339();

    match state.registry().health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "backend": backend,
                "timestamp": timestamp
            })),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "backend": backend,
                    "error": e.to_string(),
                    "timestamp": timestamp
                })),
            )
                .into_response()
        }
    }
}

/// Handler for the liveness probe.
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness probe.
///
/// Ready once the backend answers a health check.
pub async fn readiness_handler(State(state): State<AppState>) -> Response {
    debug!("Processing readiness check request");

    let storage = match state.registry().health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "not-ready",
                    "checks": { "storage": e.to_string() }
                })),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ready",
            "resources": state.registry().resources().collect::<Vec<_>>(),
            "checks": { "storage": storage }
        })),
    )
        .into_response()
}
