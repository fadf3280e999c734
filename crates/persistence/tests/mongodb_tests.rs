//! MongoDB backend integration tests.
//!
//! Run against a testcontainers-managed MongoDB. Each test gets its own
//! database so tests can share one container.

#![cfg(feature = "mongodb")]

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use placeholder_persistence::backends::mongodb::{MongoBackend, MongoConfig};
use placeholder_persistence::core::{Backend, BackendKind};
use placeholder_persistence::error::StorageError;
use placeholder_persistence::registry::ResourceRegistry;
use placeholder_persistence::seed::{SeedLoader, SeedMode};
use serde_json::{Value, json};
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;
use tokio::sync::OnceCell;
use uuid::Uuid;

use common::{record, standard_snapshot};

/// Shared MongoDB container reused across all tests in this file.
struct SharedMongo {
    url: String,
    /// Kept alive for the duration of the test binary; dropped at process exit.
    _container: testcontainers::ContainerAsync<Mongo>,
}

static SHARED_MONGO: OnceCell<SharedMongo> = OnceCell::const_new();

async fn shared_mongo() -> &'static SharedMongo {
    SHARED_MONGO
        .get_or_init(|| async {
            let run_id = std::env::var("GITHUB_RUN_ID").unwrap_or_default();
            let container = Mongo::default()
                .with_label("github.run_id", &run_id)
                .start()
                .await
                .expect("Failed to start MongoDB container");

            let host = container.get_host().await.expect("Failed to get host");
            let port = container
                .get_host_port_ipv4(27017)
                .await
                .expect("Failed to get host port");

            SharedMongo {
                url: format!("mongodb://{}:{}", host, port),
                _container: container,
            }
        })
        .await
}

async fn create_backend() -> MongoBackend {
    let mongo = shared_mongo().await;
    let database = format!("test_{}", Uuid::new_v4().simple());
    MongoBackend::connect(MongoConfig::new(&mongo.url, database))
        .await
        .expect("Failed to connect to MongoDB")
}

async fn create_registry() -> ResourceRegistry {
    ResourceRegistry::with_defaults(Arc::new(create_backend().await))
        .await
        .expect("Failed to open registry")
}

async fn seeded_registry() -> ResourceRegistry {
    let registry = create_registry().await;
    SeedLoader::load(&registry, &standard_snapshot(), SeedMode::Bulk)
        .await
        .expect("Failed to seed");
    registry
}

#[tokio::test]
async fn test_backend_identity_and_health() {
    let backend = create_backend().await;
    assert_eq!(backend.kind(), BackendKind::MongoDB);
    assert_eq!(backend.name(), "mongodb");
    assert!(backend.health_check().await.is_ok());
    backend.close().await.unwrap();
}

#[tokio::test]
async fn test_create_then_get_hides_object_id() {
    let registry = seeded_registry().await;
    let albums = registry.store_for("albums").unwrap();

    let created = albums
        .create(record(json!({"userId": 1, "id": 110, "title": "New Album 1"})))
        .await
        .unwrap();

    let read = albums.get("110").await.unwrap();
    assert_eq!(read, created);
    assert!(!read.contains_key("_id"));
    assert_eq!(
        Value::Object(read),
        json!({"userId": 1, "id": 110, "title": "New Album 1"})
    );
}

#[tokio::test]
async fn test_duplicate_create_is_rejected_by_unique_index() {
    let registry = seeded_registry().await;
    let albums = registry.store_for("albums").unwrap();

    let result = albums
        .create(record(json!({"userId": 1, "id": 1, "title": "dup"})))
        .await;
    assert!(matches!(result, Err(StorageError::DuplicateKey { .. })));
    assert_eq!(
        albums.get("1").await.unwrap()["title"],
        json!("quidem molestiae enim")
    );
}

#[tokio::test]
async fn test_allocation_follows_snapshot_and_skips_deleted() {
    let registry = seeded_registry().await;
    let todos = registry.store_for("todos").unwrap();

    let first = todos.create(record(json!({"title": "a"}))).await.unwrap();
    assert_eq!(first["id"], json!(11));
    assert_eq!(first["completed"], json!(false));

    todos.delete("11").await.unwrap();
    let second = todos.create(record(json!({"title": "b"}))).await.unwrap();
    assert_eq!(second["id"], json!(12));
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let registry = create_registry().await;
    let comments = registry.store_for("comments").unwrap();

    let handles: Vec<_> = (0..16)
        .map(|n| {
            let store = comments.clone();
            tokio::spawn(async move {
                store
                    .create(record(json!({"postId": 1, "name": format!("c{}", n)})))
                    .await
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let created = handle.await.unwrap().unwrap();
        assert!(ids.insert(created["id"].as_i64().unwrap()));
    }
    assert_eq!(comments.count().await.unwrap(), 16);
}

#[tokio::test]
async fn test_update_merges_and_keeps_id() {
    let registry = seeded_registry().await;
    let todos = registry.store_for("todos").unwrap();

    let updated = todos
        .update("10", record(json!({"id": 99, "title": "x"})))
        .await
        .unwrap();
    assert_eq!(
        Value::Object(updated),
        json!({"userId": 1, "id": 10, "title": "x", "completed": true})
    );

    let missing = todos.update("999", record(json!({"title": "x"}))).await;
    assert!(matches!(missing, Err(StorageError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_and_list_order() {
    let registry = seeded_registry().await;
    let users = registry.store_for("users").unwrap();

    users.delete("1").await.unwrap();
    assert!(matches!(users.get("1").await, Err(StorageError::NotFound { .. })));
    assert!(matches!(users.delete("1").await, Err(StorageError::NotFound { .. })));

    users.create(record(json!({"name": "Clementine"}))).await.unwrap();
    let ids: Vec<_> = users
        .list()
        .await
        .unwrap()
        .iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(2), json!(3)]);
}

#[tokio::test]
async fn test_bulk_insert_reports_duplicates() {
    let registry = seeded_registry().await;
    let albums = registry.store_for("albums").unwrap();

    let result = albums
        .bulk_insert(vec![record(json!({"id": 2, "title": "again"}))])
        .await;
    assert!(matches!(result, Err(StorageError::DuplicateKey { ref id, .. }) if id == "2"));
}

#[tokio::test]
async fn test_skip_existing_seed_counts_skips() {
    let registry = seeded_registry().await;

    let report = SeedLoader::load(&registry, &standard_snapshot(), SeedMode::SkipExisting)
        .await
        .unwrap();
    assert_eq!(report.total_inserted(), 0);
    assert_eq!(report.total_skipped(), standard_snapshot().total_records());
}

#[tokio::test]
async fn test_reopen_keeps_high_water() {
    let mongo = shared_mongo().await;
    let database = format!("test_{}", Uuid::new_v4().simple());

    {
        let backend = MongoBackend::connect(MongoConfig::new(&mongo.url, &database))
            .await
            .unwrap();
        let registry = ResourceRegistry::with_defaults(Arc::new(backend)).await.unwrap();
        let posts = registry.store_for("posts").unwrap();
        posts.create(record(json!({"title": "one"}))).await.unwrap();
        posts.create(record(json!({"title": "two"}))).await.unwrap();
        posts.delete("2").await.unwrap();
        registry.close().await.unwrap();
    }

    let backend = MongoBackend::connect(MongoConfig::new(&mongo.url, &database))
        .await
        .unwrap();
    let registry = ResourceRegistry::with_defaults(Arc::new(backend)).await.unwrap();
    let posts = registry.store_for("posts").unwrap();
    let created = posts.create(record(json!({"title": "three"}))).await.unwrap();
    assert_eq!(created["id"], json!(3));
}

#[tokio::test]
async fn test_reseed_after_reopen_keeps_state() {
    let mongo = shared_mongo().await;
    let database = format!("test_{}", Uuid::new_v4().simple());

    {
        let backend = MongoBackend::connect(MongoConfig::new(&mongo.url, &database))
            .await
            .unwrap();
        let registry = ResourceRegistry::with_defaults(Arc::new(backend)).await.unwrap();
        SeedLoader::load(&registry, &standard_snapshot(), SeedMode::IfEmpty)
            .await
            .unwrap();
        registry.store_for("users").unwrap().delete("1").await.unwrap();
        registry.close().await.unwrap();
    }

    let backend = MongoBackend::connect(MongoConfig::new(&mongo.url, &database))
        .await
        .unwrap();
    let registry = ResourceRegistry::with_defaults(Arc::new(backend)).await.unwrap();
    let report = SeedLoader::load(&registry, &standard_snapshot(), SeedMode::IfEmpty)
        .await
        .unwrap();

    assert_eq!(report.total_inserted(), 0);
    assert!(matches!(
        registry.store_for("users").unwrap().get("1").await,
        Err(StorageError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_allocation_fails_once_ids_are_exhausted() {
    let registry = create_registry().await;
    let albums = registry.store_for("albums").unwrap();

    albums
        .create(record(json!({"id": i64::MAX, "title": "last"})))
        .await
        .unwrap();
    let result = albums.create(record(json!({"title": "auto"}))).await;
    assert!(matches!(result, Err(StorageError::Backend(_))));
    assert_eq!(albums.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_rejects_dotted_field_names() {
    let registry = seeded_registry().await;
    let users = registry.store_for("users").unwrap();

    let result = users
        .update("1", record(json!({"address.city": "Elsewhere"})))
        .await;
    assert!(matches!(result, Err(StorageError::InvalidRecord { .. })));
    assert_eq!(
        users.get("1").await.unwrap()["address"]["city"],
        json!("Gwenborough")
    );
}
