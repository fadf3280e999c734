//! Snapshot seeding CLI
//!
//! Loads a snapshot file into a database, one collection per resource.
//!
//! # Usage
//!
//! ```bash
//! # Load into a local MongoDB
//! placeholder-seed data/data.json --url mongodb://localhost:27017 --database webAPINoSQL
//!
//! # Top up an existing SQLite file, leaving present records alone
//! placeholder-seed data/data.json --url ./records.db --skip-existing
//!
//! # Only albums and users
//! placeholder-seed data/data.json --resources albums,users
//! ```
//!
//! # Environment Variables
//!
//! - `SEED_URL` - Target database (default: mongodb://localhost:27017)
//! - `SEED_DATABASE` - MongoDB database name (default: placeholder)
//! - `SEED_LOG_LEVEL` - Log level (default: info)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use placeholder_persistence::core::Backend;
use placeholder_persistence::registry::ResourceRegistry;
use placeholder_persistence::seed::{SeedLoader, SeedMode, Snapshot};
use placeholder_persistence::types::ResourceSchema;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Load a snapshot into a MongoDB database or a SQLite file.
#[derive(Debug, Parser)]
#[command(name = "placeholder-seed", version, about)]
struct Args {
    /// Snapshot file: a JSON object of resource name to record array.
    #[arg(default_value = "data/data.json")]
    snapshot: PathBuf,

    /// `mongodb://` connection string, or a SQLite file path.
    #[arg(long, env = "SEED_URL", default_value = "mongodb://localhost:27017")]
    url: String,

    /// MongoDB database name.
    #[arg(long, env = "SEED_DATABASE", default_value = "placeholder")]
    database: String,

    /// Insert only records whose id is not already present.
    #[arg(long)]
    skip_existing: bool,

    /// Comma-separated resources to load (default: every resource in the snapshot).
    #[arg(long, value_delimiter = ',')]
    resources: Vec<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "SEED_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn is_mongo_url(url: &str) -> bool {
    url.starts_with("mongodb://") || url.starts_with("mongodb+srv://")
}

async fn connect(args: &Args) -> anyhow::Result<Arc<dyn Backend>> {
    if is_mongo_url(&args.url) {
        return connect_mongo(args).await;
    }
    open_sqlite(args)
}

#[cfg(feature = "mongodb")]
async fn connect_mongo(args: &Args) -> anyhow::Result<Arc<dyn Backend>> {
    use placeholder_persistence::backends::mongodb::{MongoBackend, MongoConfig};

    let config = MongoConfig {
        app_name: Some("placeholder-seed".to_string()),
        ..MongoConfig::new(&args.url, &args.database)
    };
    let backend = MongoBackend::connect(config)
        .await
        .with_context(|| format!("connecting to {}", args.url))?;
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongo(_args: &Args) -> anyhow::Result<Arc<dyn Backend>> {
    anyhow::bail!("MongoDB support not compiled in. Rebuild with --features mongodb")
}

#[cfg(feature = "sqlite")]
fn open_sqlite(args: &Args) -> anyhow::Result<Arc<dyn Backend>> {
    use placeholder_persistence::backends::sqlite::SqliteBackend;

    let backend = SqliteBackend::open(&args.url)
        .with_context(|| format!("opening SQLite database {}", args.url))?;
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_args: &Args) -> anyhow::Result<Arc<dyn Backend>> {
    anyhow::bail!("SQLite support not compiled in. Rebuild with --features sqlite")
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut snapshot = Snapshot::from_path(&args.snapshot)
        .with_context(|| format!("reading {}", args.snapshot.display()))?;
    if !args.resources.is_empty() {
        snapshot.retain(|name| args.resources.iter().any(|r| r == name));
    }

    let mode = if args.skip_existing {
        SeedMode::SkipExisting
    } else {
        SeedMode::Bulk
    };

    // Open stores for every snapshot entry, plus the standard set.
    let mut schemas = ResourceSchema::defaults();
    for name in snapshot.resources() {
        if !schemas.iter().any(|s| s.name == name) {
            schemas.push(ResourceSchema::new(name));
        }
    }

    let backend = connect(&args).await?;
    tracing::info!(
        backend = backend.name(),
        snapshot = %args.snapshot.display(),
        resources = snapshot.len(),
        records = snapshot.total_records(),
        ?mode,
        "Seeding"
    );

    let registry = ResourceRegistry::open(backend, schemas).await?;
    let outcome = SeedLoader::load(&registry, &snapshot, mode).await;

    // Release the connection whether or not the load succeeded.
    if let Err(e) = registry.close().await {
        tracing::warn!(error = %e, "Failed to close backend cleanly");
    }

    let report = outcome?;
    tracing::info!(
        inserted = report.total_inserted(),
        skipped = report.total_skipped(),
        "Snapshot loaded"
    );
    for entry in &report.resources {
        println!(
            "{:<12} inserted {:>6}  skipped {:>6}",
            entry.resource, entry.inserted, entry.skipped
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},placeholder_persistence=info", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("Seeding failed: {:#}", e);
        std::process::exit(1);
    }
}
