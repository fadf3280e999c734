//! Server configuration for the REST API.
//!
//! Configuration comes from command line flags, with environment variables as
//! fallbacks, or is built programmatically.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REST_SERVER_PORT` | 3000 | Server port |
//! | `REST_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `REST_LOG_LEVEL` | info | Log level |
//! | `REST_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `REST_ENABLE_CORS` | true | Enable CORS |
//! | `REST_CORS_ORIGINS` | * | Allowed origins |
//! | `REST_CORS_METHODS` | GET,POST,PUT,PATCH,DELETE,OPTIONS | Allowed methods |
//! | `REST_CORS_HEADERS` | Content-Type,Accept | Allowed headers |
//! | `REST_BASE_URL` | http://localhost:3000 | Base URL for `Location` headers |
//! | `REST_STORAGE_BACKEND` | memory | `memory`, `sqlite` or `mongodb` |
//! | `REST_DATABASE_URL` | - | SQLite file path or MongoDB connection string |
//! | `REST_DATABASE_NAME` | placeholder | MongoDB database name |
//! | `REST_DATA_PATH` | data/data.json | Snapshot file loaded at startup |
//! | `REST_SEED_ON_START` | true | Load the snapshot at startup |
//!
//! # Example
//!
//! ```rust
//! use placeholder_persistence::BackendKind;
//! use placeholder_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 8080,
//!     storage_backend: BackendKind::Sqlite,
//!     database_url: Some("placeholder.db".to_string()),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use clap::Parser;
use placeholder_persistence::BackendKind;

/// Server configuration for the REST API.
#[derive(Debug, Clone, Parser)]
#[command(name = "placeholder-server")]
#[command(about = "Placeholder JSON resource server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "REST_SERVER_PORT", default_value = "3000")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "REST_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "REST_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "REST_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "REST_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "REST_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "REST_CORS_METHODS",
        default_value = "GET,POST,PUT,PATCH,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(long, env = "REST_CORS_HEADERS", default_value = "Content-Type,Accept")]
    pub cors_headers: String,

    /// Base URL for the server (used in Location headers).
    #[arg(long, env = "REST_BASE_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Storage backend: memory, sqlite or mongodb.
    #[arg(long, env = "REST_STORAGE_BACKEND", default_value = "memory")]
    pub storage_backend: BackendKind,

    /// SQLite file path or MongoDB connection string.
    ///
    /// Without it, the sqlite backend runs in memory.
    #[arg(long, env = "REST_DATABASE_URL")]
    pub database_url: Option<String>,

    /// MongoDB database name.
    #[arg(long, env = "REST_DATABASE_NAME", default_value = "placeholder")]
    pub database_name: String,

    /// Snapshot file loaded at startup.
    #[arg(long, env = "REST_DATA_PATH", default_value = "data/data.json")]
    pub data_path: PathBuf,

    /// Load the snapshot at startup.
    #[arg(
        long,
        env = "REST_SEED_ON_START",
        default_value = "true",
        action = clap::ArgAction::Set
    )]
    pub seed_on_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,PATCH,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Accept".to_string(),
            base_url: "http://localhost:3000".to_string(),
            storage_backend: BackendKind::Memory,
            database_url: None,
            database_name: "placeholder".to_string(),
            data_path: PathBuf::from("data/data.json"),
            seed_on_start: true,
        }
    }
}

impl ServerConfig {
    /// Parses flags and environment, falling back to defaults on error.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the `Location` URL of a record.
    pub fn record_url(&self, resource: &str, id: impl std::fmt::Display) -> String {
        format!("{}/{}/{}", self.base_url.trim_end_matches('/'), resource, id)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.storage_backend == BackendKind::MongoDB && self.database_url.is_none() {
            errors.push("The mongodb backend requires a database URL".to_string());
        }

        if self.database_name.trim().is_empty() {
            errors.push("Database name cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses an ephemeral port and an unseeded in-memory backend.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://localhost:3000".to_string(),
            seed_on_start: false,
            ..Default::default()
        }
    }
}
