//! End-to-end scenarios against the bundled snapshot, run on every enabled
//! backend.

mod common;

use std::collections::HashSet;

use serde_json::json;

use common::assertions::{assert_error_code, assert_location, assert_status, data};
use common::harness::RestTestHarness;

async fn create_album_with_explicit_id(harness: RestTestHarness) {
    let album = json!({"userId": 1, "id": 110, "title": "New Album 1"});

    let response = harness.server.post("/albums").json(&album).await;
    assert_status(&response, 201);
    assert_location(&response, "http://localhost:3000/albums/110");
    assert_eq!(data(&response), album);

    let read = harness.server.get("/albums/110").await;
    assert_status(&read, 200);
    assert_eq!(data(&read), album);
}
seeded_test!(create_album_with_explicit_id);

async fn create_duplicate_album_fails(harness: RestTestHarness) {
    let before = data(&harness.server.get("/albums/1").await);

    let response = harness
        .server
        .post("/albums")
        .json(&json!({"userId": 9, "id": 1, "title": "impostor"}))
        .await;
    assert_status(&response, 500);
    assert_error_code(&response, "duplicate-key");

    assert_eq!(data(&harness.server.get("/albums/1").await), before);
}
seeded_test!(create_duplicate_album_fails);

async fn update_todo_preserves_fields(harness: RestTestHarness) {
    let response = harness.server.put("/todos/10").json(&json!({"title": "x"})).await;
    assert_status(&response, 200);
    assert_eq!(
        data(&response),
        json!({"userId": 1, "id": 10, "title": "x", "completed": false})
    );
    assert_eq!(data(&harness.server.get("/todos/10").await)["title"], json!("x"));
}
seeded_test!(update_todo_preserves_fields);

async fn delete_user_then_read(harness: RestTestHarness) {
    let response = harness.server.delete("/users/1").await;
    assert_status(&response, 200);
    assert_eq!(data(&response), json!({}));

    let read = harness.server.get("/users/1").await;
    assert_status(&read, 404);
    assert_error_code(&read, "not-found");

    let remaining = data(&harness.server.get("/users").await);
    assert_eq!(remaining.as_array().unwrap().len(), 9);
}
seeded_test!(delete_user_then_read);

async fn allocation_continues_after_snapshot(harness: RestTestHarness) {
    let response = harness
        .server
        .post("/photos")
        .json(&json!({"albumId": 1, "title": "new"}))
        .await;
    assert_status(&response, 201);
    assert_eq!(data(&response)["id"], json!(201));

    assert_status(&harness.server.delete("/photos/201").await, 200);
    let again = harness.server.post("/photos").json(&json!({"title": "next"})).await;
    assert_eq!(data(&again)["id"], json!(202));
}
seeded_test!(allocation_continues_after_snapshot);

async fn list_returns_snapshot_in_order(harness: RestTestHarness) {
    let posts = data(&harness.server.get("/posts").await);
    let ids: Vec<i64> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, (1..=100).collect::<Vec<_>>());
}
seeded_test!(list_returns_snapshot_in_order);

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let harness = RestTestHarness::memory_seeded().await;
    let store = harness.registry.store_for("comments").unwrap();

    let handles: Vec<_> = (0..32)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move {
                let payload = json!({"postId": 1, "name": format!("c{}", n)});
                store.create(payload.as_object().cloned().unwrap()).await
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let created = handle.await.unwrap().unwrap();
        let id = created["id"].as_i64().unwrap();
        assert!(id > 200, "allocated id {} collides with the snapshot", id);
        assert!(ids.insert(id));
    }

    let listed = data(&harness.server.get("/comments").await);
    assert_eq!(listed.as_array().unwrap().len(), 232);
}
