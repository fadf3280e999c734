//! Resource route configuration.

use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

/// Creates all REST API routes.
///
/// # Routes
///
/// ## System-level
/// - `GET /` - Resource catalog
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// ## Collection-level
/// - `GET /{resource}` - List
/// - `POST /{resource}` - Create
///
/// ## Record-level
/// - `GET /{resource}/{id}` - Read
/// - `PUT /{resource}/{id}` - Update
/// - `PATCH /{resource}/{id}` - Update
/// - `DELETE /{resource}/{id}` - Delete
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // System-level routes
        .route("/", get(handlers::catalog_handler))
        .route("/health", get(handlers::health_handler))
        .route("/_liveness", get(handlers::health::liveness_handler))
        .route("/_readiness", get(handlers::health::readiness_handler))
        // Collection-level routes
        .route(
            "/{resource}",
            get(handlers::list_handler).post(handlers::create_handler),
        )
        // Record-level routes
        .route(
            "/{resource}/{id}",
            get(handlers::read_handler)
                .put(handlers::update_handler)
                .patch(handlers::update_handler)
                .delete(handlers::delete_handler),
        )
        .with_state(state)
}
