//! # placeholder-rest - JSON REST API for placeholder resources
//!
//! This crate exposes the collections of a
//! [`ResourceRegistry`](placeholder_persistence::ResourceRegistry) over HTTP
//! with create, list, read, update and delete endpoints.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use placeholder_persistence::{ResourceRegistry, backends::memory::MemoryBackend};
//! use placeholder_rest::{create_app_with_config, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = ResourceRegistry::with_defaults(Arc::new(MemoryBackend::new())).await?;
//!     let config = ServerConfig::default();
//!
//!     let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//!     let app = create_app_with_config(Arc::new(registry), config);
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern | Success |
//! |------------|-------------|-------------|---------|
//! | create | POST | `/[resource]` | 201 |
//! | list | GET | `/[resource]` | 200 |
//! | read | GET | `/[resource]/[id]` | 200 |
//! | update | PUT, PATCH | `/[resource]/[id]` | 200 |
//! | delete | DELETE | `/[resource]/[id]` | 200 |
//! | catalog | GET | `/` | 200 |
//!
//! Successful responses are `{"data": ...}`; delete answers `{"data": {}}`.
//!
//! ## Error Handling
//!
//! Errors are `{"error": {"code": ..., "message": ...}}`:
//!
//! | HTTP Status | Code | Description |
//! |-------------|------|-------------|
//! | 400 | invalid-record | Body is not a JSON object, or a bad `id` |
//! | 404 | unknown-resource | Resource name not configured |
//! | 404 | not-found | No such record (including malformed ids) |
//! | 500 | duplicate-key | Create collided with an existing id |
//! | 500 | backend-error | Storage failure |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and status mapping
//! - [`config`] - Server configuration
//! - [`state`] - Application state (registry, configuration)
//! - [`operation`] - Transport-agnostic operation execution
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] - Request body extraction
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod operation;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use operation::{Envelope, Operation, execute};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use placeholder_persistence::ResourceRegistry;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
pub fn create_app(registry: Arc<ResourceRegistry>) -> Router {
    create_app_with_config(registry, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Installs the routes plus tracing, request timeout and (when enabled) CORS
/// layers.
pub fn create_app_with_config(registry: Arc<ResourceRegistry>, config: ServerConfig) -> Router {
    info!(
        backend = %registry.backend_kind(),
        resources = ?registry.resources().collect::<Vec<_>>(),
        "Creating REST API server"
    );

    let state = AppState::new(registry, config.clone());
    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// Call once at startup. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "placeholder_rest={level},placeholder_persistence={level},placeholder_server={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
