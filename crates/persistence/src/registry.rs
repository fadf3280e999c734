//! Resource registry.
//!
//! The [`ResourceRegistry`] binds each configured resource name to the
//! [`RecordStore`] that holds it. It is built once at startup from a backend and
//! a list of [`ResourceSchema`]s, and is immutable afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::core::{Backend, BackendKind, RecordStore};
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::ResourceSchema;

/// Summary of one resource, as listed by [`ResourceRegistry::catalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSummary {
    /// Resource name.
    pub name: String,
    /// Known field names.
    pub fields: Vec<String>,
    /// Number of records currently stored.
    pub count: u64,
}

/// Maps resource names to their stores.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use placeholder_persistence::backends::memory::MemoryBackend;
/// use placeholder_persistence::registry::ResourceRegistry;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let registry = ResourceRegistry::with_defaults(Arc::new(MemoryBackend::new()))
///     .await
///     .unwrap();
///
/// assert!(registry.store_for("albums").is_ok());
/// assert!(registry.store_for("widgets").is_err());
/// # });
/// ```
pub struct ResourceRegistry {
    backend: Arc<dyn Backend>,
    order: Vec<String>,
    entries: HashMap<String, (ResourceSchema, Arc<dyn RecordStore>)>,
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("backend", &self.backend.name())
            .field("resources", &self.order)
            .finish()
    }
}

impl ResourceRegistry {
    /// Opens a store for every schema on `backend`.
    ///
    /// A schema listed twice keeps its first position; the later definition
    /// wins.
    pub async fn open(
        backend: Arc<dyn Backend>,
        schemas: Vec<ResourceSchema>,
    ) -> StorageResult<Self> {
        let mut order = Vec::with_capacity(schemas.len());
        let mut entries = HashMap::with_capacity(schemas.len());

        for schema in schemas {
            let store = backend.open_store(&schema).await?;
            if !entries.contains_key(&schema.name) {
                order.push(schema.name.clone());
            }
            entries.insert(schema.name.clone(), (schema, store));
        }

        tracing::info!(
            backend = backend.name(),
            resources = ?order,
            "Resource registry ready"
        );

        Ok(Self {
            backend,
            order,
            entries,
        })
    }

    /// Opens the six standard resources on `backend`.
    pub async fn with_defaults(backend: Arc<dyn Backend>) -> StorageResult<Self> {
        Self::open(backend, ResourceSchema::defaults()).await
    }

    /// Returns the store for `resource`.
    ///
    /// # Errors
    ///
    /// * `StorageError::UnknownResource` - The name is not configured
    pub fn store_for(&self, resource: &str) -> StorageResult<Arc<dyn RecordStore>> {
        self.entries
            .get(resource)
            .map(|(_, store)| Arc::clone(store))
            .ok_or_else(|| StorageError::UnknownResource {
                resource: resource.to_string(),
            })
    }

    /// Returns the schema for `resource`, if configured.
    pub fn schema(&self, resource: &str) -> Option<&ResourceSchema> {
        self.entries.get(resource).map(|(schema, _)| schema)
    }

    /// Returns whether `resource` is configured.
    pub fn contains(&self, resource: &str) -> bool {
        self.entries.contains_key(resource)
    }

    /// Configured resource names, in configuration order.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Lists every resource with its fields and current record count.
    pub async fn catalog(&self) -> StorageResult<Vec<ResourceSummary>> {
        let mut summaries = Vec::with_capacity(self.order.len());
        for name in &self.order {
            let Some((schema, store)) = self.entries.get(name) else {
                continue;
            };
            summaries.push(ResourceSummary {
                name: name.clone(),
                fields: schema.field_names().map(str::to_string).collect(),
                count: store.count().await?,
            });
        }
        Ok(summaries)
    }

    /// Returns the backend the stores live on.
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Returns the kind of backend in use.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Checks that the backend is reachable.
    pub async fn health_check(&self) -> Result<(), BackendError> {
        self.backend.health_check().await
    }

    /// Tears down the backend. Stores must not be used afterwards.
    pub async fn close(&self) -> Result<(), BackendError> {
        tracing::info!(backend = self.backend.name(), "Closing resource registry");
        self.backend.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::memory::MemoryBackend;
    use crate::types::FieldSpec;

    #[tokio::test]
    async fn test_resources_keep_configuration_order() {
        let registry = ResourceRegistry::open(
            Arc::new(MemoryBackend::new()),
            vec![
                ResourceSchema::new("todos"),
                ResourceSchema::new("albums"),
                ResourceSchema::new("todos").with_field(FieldSpec::optional("title")),
            ],
        )
        .await
        .unwrap();

        let names: Vec<_> = registry.resources().collect();
        assert_eq!(names, vec!["todos", "albums"]);
        assert_eq!(registry.schema("todos").unwrap().fields.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_resource() {
        let registry = ResourceRegistry::with_defaults(Arc::new(MemoryBackend::new()))
            .await
            .unwrap();

        let err = registry.store_for("widgets").err().unwrap();
        assert!(matches!(err, StorageError::UnknownResource { ref resource } if resource == "widgets"));
        assert!(!registry.contains("widgets"));
    }

    #[tokio::test]
    async fn test_catalog_counts_records() {
        let registry = ResourceRegistry::with_defaults(Arc::new(MemoryBackend::new()))
            .await
            .unwrap();
        registry
            .store_for("users")
            .unwrap()
            .create(serde_json::json!({"name": "Ann"}).as_object().cloned().unwrap())
            .await
            .unwrap();

        let catalog = registry.catalog().await.unwrap();
        assert_eq!(catalog.len(), 6);
        let users = catalog.iter().find(|s| s.name == "users").unwrap();
        assert_eq!(users.count, 1);
        assert!(users.fields.contains(&"email".to_string()));
    }
}
