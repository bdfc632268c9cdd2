//! Repository lifecycle against a live MongoDB.
//!
//! # Design
//! Needs a reachable server, so every test is `#[ignore]`d. Run with
//! `MONGODB_URI=mongodb://localhost:27017 cargo test -p todo-core -- --ignored`.
//! Each run writes to its own throwaway database and drops it afterwards.

use mongodb::Client;
use todo_core::{MongoStore, NewTodo, TodoError, TodoPatch, TodoRepository};

async fn repository(database: &str) -> TodoRepository {
    let uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set for ignored tests");
    let store = MongoStore::connect(&uri, Some(database)).await.unwrap();
    TodoRepository::new(store)
}

async fn drop_database(database: &str) {
    let uri = std::env::var("MONGODB_URI").unwrap();
    let client = Client::with_uri_str(&uri).await.unwrap();
    client.database(database).drop(None).await.unwrap();
}

#[tokio::test]
#[ignore = "requires MONGODB_URI"]
async fn crud_lifecycle() {
    let database = format!("todo_core_test_{}", std::process::id());
    let repo = repository(&database).await;

    let created = repo
        .create(NewTodo {
            title: Some("Tarea para buscar".to_string()),
            description: Some("en mongo".to_string()),
        })
        .await
        .unwrap();
    assert!(!created.completed);
    let id = created.id.to_string();

    let fetched = repo.get_by_id(&id).await.unwrap();
    assert_eq!(fetched, created);

    let found = repo.search_by_title("BUSCAR").await.unwrap();
    assert_eq!(found.len(), 1);

    let patch: TodoPatch = serde_json::from_str(r#"{"description":null}"#).unwrap();
    let updated = repo.update(&id, patch).await.unwrap();
    assert_eq!(updated.description, None);
    assert_eq!(updated.title, "Tarea para buscar");

    let completed = repo.complete(&id).await.unwrap();
    assert!(completed.completed);

    let stats = repo.stats().await.unwrap();
    assert_eq!((stats.total, stats.completed, stats.pending), (1, 1, 0));
    assert_eq!(stats.completion_rate, 100.0);

    repo.delete(&id).await.unwrap();
    assert_eq!(repo.get_by_id(&id).await.unwrap_err(), TodoError::NotFound);
    assert_eq!(repo.delete(&id).await.unwrap_err(), TodoError::NotFound);

    drop_database(&database).await;
}

#[tokio::test]
#[ignore = "requires MONGODB_URI"]
async fn invalid_pattern_surfaces_as_store_error() {
    let database = format!("todo_core_regex_{}", std::process::id());
    let repo = repository(&database).await;

    let err = repo.search_by_title("[").await.unwrap_err();
    assert!(matches!(err, TodoError::Store(_)));

    drop_database(&database).await;
}
