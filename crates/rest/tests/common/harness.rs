//! REST API test harness.

use std::path::PathBuf;
use std::sync::Arc;

use axum_test::TestServer;
use placeholder_persistence::backends::memory::MemoryBackend;
use placeholder_persistence::core::Backend;
use placeholder_persistence::seed::{SeedLoader, SeedMode, Snapshot};
use placeholder_persistence::ResourceRegistry;
use placeholder_rest::{ServerConfig, create_app_with_config};

/// Base URL the harness configures for `Location` headers.
pub const BASE_URL: &str = "http://localhost:3000";

/// Path of the bundled snapshot.
pub fn bundled_snapshot_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/data.json")
}

/// A test server over a registry of the six standard resources.
pub struct RestTestHarness {
    /// The test server instance.
    pub server: TestServer,
    /// The registry behind the server.
    pub registry: Arc<ResourceRegistry>,
    /// Keeps a file database alive for the test's duration.
    _dir: Option<tempfile::TempDir>,
}

impl RestTestHarness {
    async fn from_backend(
        backend: Arc<dyn Backend>,
        seed: bool,
        dir: Option<tempfile::TempDir>,
    ) -> Self {
        let registry = ResourceRegistry::with_defaults(backend)
            .await
            .expect("Failed to open registry");

        if seed {
            let snapshot =
                Snapshot::from_path(bundled_snapshot_path()).expect("Failed to read snapshot");
            SeedLoader::load(&registry, &snapshot, SeedMode::Bulk)
                .await
                .expect("Failed to seed snapshot");
        }

        let registry = Arc::new(registry);
        let config = ServerConfig {
            base_url: BASE_URL.to_string(),
            ..ServerConfig::for_testing()
        };
        let app = create_app_with_config(Arc::clone(&registry), config);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            registry,
            _dir: dir,
        }
    }

    /// Empty in-memory backend.
    pub async fn memory() -> Self {
        Self::from_backend(Arc::new(MemoryBackend::new()), false, None).await
    }

    /// In-memory backend loaded with the bundled snapshot.
    pub async fn memory_seeded() -> Self {
        Self::from_backend(Arc::new(MemoryBackend::new()), true, None).await
    }

    /// SQLite file database loaded with the bundled snapshot.
    #[cfg(feature = "sqlite")]
    pub async fn sqlite_seeded() -> Self {
        use placeholder_persistence::backends::sqlite::SqliteBackend;

        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let backend =
            SqliteBackend::open(dir.path().join("rest.db")).expect("Failed to open SQLite file");
        Self::from_backend(Arc::new(backend), true, Some(dir)).await
    }
}

/// Defines a test that runs against every enabled backend, seeded with the
/// bundled snapshot.
///
/// The body is an `async fn(RestTestHarness)` defined next to the macro call.
#[macro_export]
macro_rules! seeded_test {
    ($test_name:ident) => {
        mod $test_name {
            #[tokio::test]
            async fn memory() {
                let harness = $crate::common::harness::RestTestHarness::memory_seeded().await;
                super::$test_name(harness).await;
            }

            #[cfg(feature = "sqlite")]
            #[tokio::test]
            async fn sqlite() {
                let harness = $crate::common::harness::RestTestHarness::sqlite_seeded().await;
                super::$test_name(harness).await;
            }
        }
    };
}
