//! Snapshot fixtures shaped like the bundled dataset, trimmed to what tests
//! need.

use placeholder_persistence::Record;
use placeholder_persistence::seed::Snapshot;
use serde_json::{Value, json};

/// Turns a JSON object literal into a [`Record`].
pub fn record(value: Value) -> Record {
    value
        .as_object()
        .cloned()
        .expect("fixture record must be a JSON object")
}

/// A small snapshot covering every standard resource.
///
/// - `albums` 1..=3, `users` 1..=2, `posts` 1..=2, `comments` 1..=2,
///   `photos` 1..=2, `todos` 1..=10
pub fn standard_snapshot() -> Snapshot {
    let todos: Vec<Value> = (1..=10)
        .map(|id| {
            json!({
                "userId": 1,
                "id": id,
                "title": format!("todo {}", id),
                "completed": id % 2 == 0
            })
        })
        .collect();

    Snapshot::from_value(json!({
        "albums": [
            {"userId": 1, "id": 1, "title": "quidem molestiae enim"},
            {"userId": 1, "id": 2, "title": "sunt qui excepturi placeat culpa"},
            {"userId": 2, "id": 3, "title": "omnis laborum odio"}
        ],
        "users": [
            {
                "id": 1,
                "name": "Leanne Graham",
                "username": "Bret",
                "email": "Sincere@april.biz",
                "address": {"street": "Kulas Light", "city": "Gwenborough"}
            },
            {
                "id": 2,
                "name": "Ervin Howell",
                "username": "Antonette",
                "email": "Shanna@melissa.tv"
            }
        ],
        "posts": [
            {"userId": 1, "id": 1, "title": "sunt aut facere", "body": "quia et suscipit"},
            {"userId": 1, "id": 2, "title": "qui est esse", "body": "est rerum tempore"}
        ],
        "comments": [
            {"postId": 1, "id": 1, "name": "id labore ex", "email": "Eliseo@gardner.biz", "body": "laudantium"},
            {"postId": 1, "id": 2, "name": "quo vero", "email": "Jayne_Kuhic@sydney.com", "body": "est natus"}
        ],
        "photos": [
            {"albumId": 1, "id": 1, "title": "accusamus beatae", "url": "https://via.placeholder.com/600/92c952", "thumbnailUrl": "https://via.placeholder.com/150/92c952"},
            {"albumId": 1, "id": 2, "title": "reprehenderit est", "url": "https://via.placeholder.com/600/771796", "thumbnailUrl": "https://via.placeholder.com/150/771796"}
        ],
        "todos": todos
    }))
    .expect("standard snapshot must be valid")
}
