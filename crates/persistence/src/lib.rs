//! Placeholder Resource Server Persistence Layer
//!
//! This crate stores the records behind the resource server: collections of
//! JSON objects keyed by a positive integer `id`, held in memory, in SQLite, or
//! in MongoDB.
//!
//! # Features
//!
//! - **Pluggable backends**: one [`RecordStore`](core::RecordStore) trait, three engines
//! - **Id allocation**: strictly increasing, never reusing a deleted id
//! - **Uniqueness**: duplicate check and insert are a single atomic step
//! - **Seeding**: bulk-load a snapshot file at boot or from the `placeholder-seed` CLI
//!
//! # Backend Features
//!
//! Enable backends with feature flags in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! placeholder-persistence = { version = "0.1", features = ["mongodb"] }
//! ```
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes
//! - `mongodb` - MongoDB document storage
//! - `seeder` - builds the `placeholder-seed` binary
//!
//! The in-memory backend is always available.
//!
//! # Architecture
//!
//! - [`types`] - Records, record ids and resource shapes
//! - [`error`] - Error types for all operations
//! - [`core`] - Storage traits
//! - [`backends`] - Backend implementations
//! - [`registry`] - Resource name to store mapping
//! - [`seed`] - Snapshot loading
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use placeholder_persistence::backends::memory::MemoryBackend;
//! use placeholder_persistence::registry::ResourceRegistry;
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let registry = ResourceRegistry::with_defaults(Arc::new(MemoryBackend::new()))
//!     .await
//!     .unwrap();
//! let albums = registry.store_for("albums").unwrap();
//!
//! let created = albums
//!     .create(json!({"userId": 1, "title": "New Album"}).as_object().cloned().unwrap())
//!     .await
//!     .unwrap();
//! assert_eq!(created["id"], json!(1));
//!
//! let updated = albums
//!     .update("1", json!({"title": "Renamed"}).as_object().cloned().unwrap())
//!     .await
//!     .unwrap();
//! assert_eq!(updated["userId"], json!(1));
//! # });
//! ```

#![warn(missing_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod registry;
pub mod seed;
pub mod types;

// Re-export commonly used types at the crate root
pub use crate::core::{Backend, BackendKind, RecordStore};
pub use error::{BackendError, SeedError, SeedResult, StorageError, StorageResult};
pub use registry::{ResourceRegistry, ResourceSummary};
pub use seed::{SeedLoader, SeedMode, SeedReport, Snapshot};
pub use types::{Record, RecordId, ResourceSchema};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
