//! Test harness infrastructure for backend testing.

use std::sync::Arc;

use placeholder_persistence::backends::memory::MemoryBackend;
use placeholder_persistence::core::{Backend, RecordStore};
use placeholder_persistence::registry::ResourceRegistry;
use placeholder_persistence::seed::{SeedLoader, SeedMode};

use super::fixtures::standard_snapshot;

/// A registry over the six standard resources on a fresh backend.
pub struct TestContext {
    /// The registry under test.
    pub registry: ResourceRegistry,
    /// Keeps a file database alive for the test's duration.
    _dir: Option<tempfile::TempDir>,
}

impl TestContext {
    async fn from_backend(backend: Arc<dyn Backend>, dir: Option<tempfile::TempDir>) -> Self {
        let registry = ResourceRegistry::with_defaults(backend)
            .await
            .expect("Failed to open registry");
        Self {
            registry,
            _dir: dir,
        }
    }

    /// In-memory backend.
    pub async fn memory() -> Self {
        Self::from_backend(Arc::new(MemoryBackend::new()), None).await
    }

    /// In-memory SQLite database.
    #[cfg(feature = "sqlite")]
    pub async fn sqlite() -> Self {
        use placeholder_persistence::backends::sqlite::SqliteBackend;

        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        Self::from_backend(Arc::new(backend), None).await
    }

    /// SQLite database in a temporary file.
    #[cfg(feature = "sqlite")]
    pub async fn sqlite_file() -> Self {
        use placeholder_persistence::backends::sqlite::SqliteBackend;

        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let backend =
            SqliteBackend::open(dir.path().join("test.db")).expect("Failed to open SQLite file");
        Self::from_backend(Arc::new(backend), Some(dir)).await
    }

    /// Returns the store for `resource`.
    pub fn store(&self, resource: &str) -> Arc<dyn RecordStore> {
        self.registry
            .store_for(resource)
            .expect("standard resource must be configured")
    }

    /// Loads the standard snapshot in bulk mode.
    pub async fn seeded(self) -> Self {
        SeedLoader::load(&self.registry, &standard_snapshot(), SeedMode::Bulk)
            .await
            .expect("Failed to seed standard snapshot");
        self
    }
}

/// Defines a test that runs against every enabled backend.
///
/// The body is an `async fn(TestContext)` defined alongside the macro call.
///
/// # Example
///
/// ```ignore
/// async fn create_then_get(ctx: TestContext) {
///     let store = ctx.store("albums");
///     let created = store.create(record(json!({"title": "t"}))).await.unwrap();
///     assert_eq!(store.get("1").await.unwrap(), created);
/// }
/// backend_test!(create_then_get);
/// ```
#[macro_export]
macro_rules! backend_test {
    ($test_name:ident) => {
        paste::paste! {
            #[tokio::test]
            async fn [<memory_ $test_name>]() {
                let ctx = $crate::common::harness::TestContext::memory().await;
                $test_name(ctx).await;
            }

            #[cfg(feature = "sqlite")]
            #[tokio::test]
            async fn [<sqlite_ $test_name>]() {
                let ctx = $crate::common::harness::TestContext::sqlite().await;
                $test_name(ctx).await;
            }

            #[cfg(feature = "sqlite")]
            #[tokio::test]
            async fn [<sqlite_file_ $test_name>]() {
                let ctx = $crate::common::harness::TestContext::sqlite_file().await;
                $test_name(ctx).await;
            }
        }
    };
}
