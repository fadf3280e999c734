//! Placeholder resource server
//!
//! Serves the six placeholder collections over HTTP from memory, SQLite or
//! MongoDB, optionally warmed from a snapshot file at startup.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use placeholder_persistence::backends::memory::MemoryBackend;
use placeholder_persistence::core::Backend;
use placeholder_persistence::seed::{SeedLoader, SeedMode, Snapshot};
use placeholder_persistence::{BackendKind, ResourceRegistry};
use placeholder_rest::{ServerConfig, create_app_with_config, init_logging};
use tracing::{info, warn};

#[cfg(feature = "sqlite")]
fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<Arc<dyn Backend>> {
    use placeholder_persistence::backends::sqlite::SqliteBackend;

    let backend = match config.database_url.as_deref() {
        None | Some(":memory:") => {
            info!("Initializing in-memory SQLite backend");
            SqliteBackend::in_memory()?
        }
        Some(path) => {
            info!(database = %path, "Initializing SQLite backend");
            SqliteBackend::open(path).with_context(|| format!("opening {}", path))?
        }
    };
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "sqlite"))]
fn create_sqlite_backend(_config: &ServerConfig) -> anyhow::Result<Arc<dyn Backend>> {
    anyhow::bail!(
        "The sqlite backend requires the 'sqlite' feature. \
         Build with: cargo build -p placeholder-server --features sqlite"
    )
}

#[cfg(feature = "mongodb")]
async fn create_mongo_backend(config: &ServerConfig) -> anyhow::Result<Arc<dyn Backend>> {
    use placeholder_persistence::backends::mongodb::{MongoBackend, MongoConfig};

    let url = config
        .database_url
        .as_deref()
        .context("the mongodb backend requires --database-url")?;
    info!(database = %config.database_name, "Initializing MongoDB backend");

    let mongo_config = MongoConfig {
        app_name: Some("placeholder-server".to_string()),
        ..MongoConfig::new(url, &config.database_name)
    };
    let backend = MongoBackend::connect(mongo_config)
        .await
        .with_context(|| format!("connecting to {}", url))?;
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "mongodb"))]
async fn create_mongo_backend(_config: &ServerConfig) -> anyhow::Result<Arc<dyn Backend>> {
    anyhow::bail!(
        "The mongodb backend requires the 'mongodb' feature. \
         Build with: cargo build -p placeholder-server --features mongodb"
    )
}

async fn create_backend(config: &ServerConfig) -> anyhow::Result<Arc<dyn Backend>> {
    match config.storage_backend {
        BackendKind::Memory => {
            info!("Initializing in-memory backend");
            Ok(Arc::new(MemoryBackend::new()))
        }
        BackendKind::Sqlite => create_sqlite_backend(config),
        BackendKind::MongoDB => create_mongo_backend(config).await,
    }
}

/// Loads the configured snapshot into the stores that are still empty.
async fn seed(registry: &ResourceRegistry, config: &ServerConfig) -> anyhow::Result<()> {
    let snapshot = Snapshot::from_path(&config.data_path)
        .with_context(|| format!("reading snapshot {}", config.data_path.display()))?;

    let mode = SeedMode::IfEmpty;
    info!(?mode, backend = %registry.backend_kind(), "Seeding from snapshot");

    let report = SeedLoader::load(registry, &snapshot, mode).await?;
    info!(
        snapshot = %config.data_path.display(),
        inserted = report.total_inserted(),
        skipped = report.total_skipped(),
        unknown = ?report.unknown,
        "Snapshot loaded"
    );
    Ok(())
}

/// Starts the Axum HTTP server and waits for Ctrl-C.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Seeds if configured, then serves until shutdown.
async fn run(registry: Arc<ResourceRegistry>, config: &ServerConfig) -> anyhow::Result<()> {
    if config.seed_on_start {
        seed(&registry, config).await?;
    }
    let app = create_app_with_config(registry, config.clone());
    serve(app, config).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %config.storage_backend,
        "Starting placeholder server"
    );

    let backend = create_backend(&config).await?;
    let registry = Arc::new(ResourceRegistry::with_defaults(backend).await?);

    let outcome = run(Arc::clone(&registry), &config).await;

    if let Err(e) = registry.close().await {
        warn!(error = %e, "Failed to close backend cleanly");
    }
    outcome
}
