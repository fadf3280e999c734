//! MongoDB backend implementation.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{Backend, BackendKind, RecordStore};
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::ResourceSchema;

use super::MongoStore;

/// Name of the collection holding per-collection high-water marks.
pub(crate) const SEQUENCES_COLLECTION: &str = "_sequences";

/// Configuration for the MongoDB backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`.
    #[serde(default = "default_url")]
    pub url: String,

    /// Database holding one collection per resource.
    #[serde(default = "default_database")]
    pub database: String,

    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// How long to wait for a usable server before failing an operation.
    #[serde(default = "default_server_selection_timeout_ms")]
    pub server_selection_timeout_ms: u64,

    /// Application name reported to the server.
    #[serde(default)]
    pub app_name: Option<String>,
}

fn default_url() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "placeholder".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    10000
}

fn default_server_selection_timeout_ms() -> u64 {
    5000
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            database: default_database(),
            connect_timeout_ms: default_connect_timeout_ms(),
            server_selection_timeout_ms: default_server_selection_timeout_ms(),
            app_name: None,
        }
    }
}

impl MongoConfig {
    /// Creates a configuration for the given URL and database.
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Default::default()
        }
    }
}

/// MongoDB backend. Each resource maps to a Mongo collection of the same name.
///
/// The client is created once in [`MongoBackend::connect`] and reused by every
/// store; [`Backend::close`] shuts it down.
pub struct MongoBackend {
    client: Mutex<Option<Client>>,
    database: Database,
    config: MongoConfig,
}

impl Debug for MongoBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoBackend")
            .field("database", &self.config.database)
            .field("open", &self.client.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl MongoBackend {
    /// Connects and verifies the server answers a `ping`.
    pub async fn connect(config: MongoConfig) -> StorageResult<Self> {
        let mut options = ClientOptions::parse(&config.url).await.map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: "mongodb".to_string(),
                message: format!("Invalid connection string: {}", e),
            })
        })?;
        options.connect_timeout = Some(Duration::from_millis(config.connect_timeout_ms));
        options.server_selection_timeout =
            Some(Duration::from_millis(config.server_selection_timeout_ms));
        if config.app_name.is_some() {
            options.app_name = config.app_name.clone();
        }

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);
        database.run_command(doc! { "ping": 1 }).await?;

        tracing::info!(database = %config.database, "Connected to MongoDB");

        Ok(Self {
            client: Mutex::new(Some(client)),
            database,
            config,
        })
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    /// Returns the database handle.
    pub fn database(&self) -> &Database {
        &self.database
    }
}

#[async_trait]
impl Backend for MongoBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::MongoDB
    }

    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn open_store(&self, schema: &ResourceSchema) -> StorageResult<Arc<dyn RecordStore>> {
        let collection = self.database.collection::<Document>(&schema.name);
        let sequences = self.database.collection::<Document>(SEQUENCES_COLLECTION);

        let index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection.create_index(index).await?;

        let store = MongoStore::new(collection, sequences, schema.clone());
        store.sync_high_water().await?;

        tracing::debug!(collection = %schema.name, "Opened MongoDB collection");
        Ok(Arc::new(store))
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| BackendError::Unavailable {
                backend_name: "mongodb".to_string(),
                message: e.to_string(),
            })
    }

    async fn close(&self) -> Result<(), BackendError> {
        let client = self.client.lock().take();
        if let Some(client) = client {
            client.shutdown().await;
            tracing::info!(database = %self.config.database, "Closed MongoDB connection");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: MongoConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.url, "mongodb://localhost:27017");
        assert_eq!(config.database, "placeholder");
        assert_eq!(config.server_selection_timeout_ms, 5000);
    }

    #[test]
    fn test_config_new_keeps_timeouts() {
        let config = MongoConfig::new("mongodb://db:27017", "webapi");
        assert_eq!(config.database, "webapi");
        assert_eq!(config.connect_timeout_ms, 10000);
    }
}
