//! In-memory backend implementation.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::{Backend, BackendKind, RecordStore};
use crate::error::{BackendError, StorageResult};
use crate::types::ResourceSchema;

use super::MemoryStore;

/// Backend that keeps every collection in process memory.
///
/// Data lives for the life of the process. Opening the same collection twice
/// returns the same store.
#[derive(Default)]
pub struct MemoryBackend {
    stores: RwLock<HashMap<String, Arc<MemoryStore>>>,
}

impl Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("collections", &self.stores.read().len())
            .finish()
    }
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn name(&self) -> &'static str {
        "memory"
    }

    async fn open_store(&self, schema: &ResourceSchema) -> StorageResult<Arc<dyn RecordStore>> {
        let mut stores = self.stores.write();
        let store = stores
            .entry(schema.name.clone())
            .or_insert_with(|| Arc::new(MemoryStore::new(schema.clone())))
            .clone();
        Ok(store)
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), BackendError> {
        self.stores.write().clear();
        tracing::debug!("Released in-memory collections");
        Ok(())
    }
}
