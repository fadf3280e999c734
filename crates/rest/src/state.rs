//! Application state for the REST API.
//!
//! Handlers share one [`AppState`]: the resource registry and the server
//! configuration, both behind `Arc`.

use std::sync::Arc;

use placeholder_persistence::ResourceRegistry;

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use placeholder_persistence::{ResourceRegistry, backends::memory::MemoryBackend};
/// use placeholder_rest::{AppState, ServerConfig};
///
/// let registry = ResourceRegistry::with_defaults(Arc::new(MemoryBackend::new())).await?;
/// let state = AppState::new(Arc::new(registry), ServerConfig::default());
/// ```
#[derive(Clone)]
pub struct AppState {
    registry: Arc<ResourceRegistry>,
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates a new AppState from a registry and configuration.
    pub fn new(registry: Arc<ResourceRegistry>, config: ServerConfig) -> Self {
        Self {
            registry,
            config: Arc::new(config),
        }
    }

    /// Returns the resource registry.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the base URL for the server.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}
