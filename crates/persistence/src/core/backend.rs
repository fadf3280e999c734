//! Backend abstraction for storage engines.
//!
//! This module defines the [`Backend`] trait: the lifecycle of a storage engine
//! (connect, hand out per-collection stores, health-check, close). Backends are
//! used through `Arc<dyn Backend>`, so the trait stays object-safe.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::RecordStore;
use crate::error::{BackendError, StorageResult};
use crate::types::ResourceSchema;

/// Identifies the type of storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Process-local memory, usually warmed from a snapshot file.
    Memory,
    /// SQLite database (file-based or in-memory).
    Sqlite,
    /// MongoDB (document store).
    MongoDB,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::Sqlite => write!(f, "sqlite"),
            BackendKind::MongoDB => write!(f, "mongodb"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(BackendKind::Memory),
            "sqlite" => Ok(BackendKind::Sqlite),
            "mongodb" | "mongo" => Ok(BackendKind::MongoDB),
            other => Err(format!(
                "unknown storage backend '{}' (expected memory, sqlite or mongodb)",
                other
            )),
        }
    }
}

/// A storage engine that can hand out [`RecordStore`]s.
///
/// A backend is created once per process. Connections it holds are reused by
/// every store it opens and are released only by an explicit [`Backend::close`].
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Returns the kind of backend.
    fn kind(&self) -> BackendKind;

    /// Returns a human-readable name for this backend.
    fn name(&self) -> &'static str;

    /// Opens the store for one collection, creating whatever the backend needs
    /// (tables, indexes, sequence rows) on the way.
    async fn open_store(&self, schema: &ResourceSchema) -> StorageResult<Arc<dyn RecordStore>>;

    /// Checks if the backend is healthy and accepting requests.
    async fn health_check(&self) -> Result<(), BackendError>;

    /// Releases connections. Stores opened from this backend must not be used
    /// afterwards.
    async fn close(&self) -> Result<(), BackendError>;
}
