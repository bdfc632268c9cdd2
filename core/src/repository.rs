//! Logical todo operations on top of a `TodoStore`.
//!
//! `TodoRepository` is cheap to clone and holds the only handle to the store,
//! so it is built once at startup and handed to every request.

use std::sync::Arc;

use tracing::debug;

use crate::error::TodoError;
use crate::memory::InMemoryStore;
use crate::store::{CountFilter, TodoStore};
use crate::types::{NewTodo, Todo, TodoChanges, TodoId, TodoPatch, TodoStats};

pub const SEARCH_TERM_REQUIRED: &str = "El parámetro de búsqueda es requerido";

#[derive(Clone)]
pub struct TodoRepository {
    store: Arc<dyn TodoStore>,
}

impl TodoRepository {
    pub fn new(store: impl TodoStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// A repository over a fresh, empty `InMemoryStore`.
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }

    pub async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        self.store.find_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Todo, TodoError> {
        let id = parse_id(id)?;
        self.store.find_by_id(id).await?.ok_or(TodoError::NotFound)
    }

    pub async fn create(&self, input: NewTodo) -> Result<Todo, TodoError> {
        let input = input.validate()?;
        let todo = self.store.insert(input).await?;
        debug!(id = %todo.id, "created todo");
        Ok(todo)
    }

    /// Applies the fields present in `patch`. An empty patch leaves the
    /// record untouched and returns it as is.
    pub async fn update(&self, id: &str, patch: TodoPatch) -> Result<Todo, TodoError> {
        let id = parse_id(id)?;
        let changes = patch.validate()?;
        if changes.is_empty() {
            return self.store.find_by_id(id).await?.ok_or(TodoError::NotFound);
        }
        self.apply(id, changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), TodoError> {
        let id = parse_id(id)?;
        if self.store.delete(id).await? {
            debug!(%id, "deleted todo");
            Ok(())
        } else {
            Err(TodoError::NotFound)
        }
    }

    pub async fn complete(&self, id: &str) -> Result<Todo, TodoError> {
        let id = parse_id(id)?;
        self.apply(id, TodoChanges::mark_completed()).await
    }

    pub async fn search_by_title(&self, pattern: &str) -> Result<Vec<Todo>, TodoError> {
        if pattern.trim().is_empty() {
            return Err(TodoError::validation(SEARCH_TERM_REQUIRED));
        }
        self.store.find_by_title(pattern).await
    }

    pub async fn stats(&self) -> Result<TodoStats, TodoError> {
        let total = self.store.count(CountFilter::All).await?;
        let completed = self.store.count(CountFilter::Completed).await?;
        Ok(TodoStats::from_counts(total, completed))
    }

    async fn apply(&self, id: TodoId, changes: TodoChanges) -> Result<Todo, TodoError> {
        let todo = self
            .store
            .update(id, changes)
            .await?
            .ok_or(TodoError::NotFound)?;
        debug!(%id, "updated todo");
        Ok(todo)
    }
}

/// A malformed id cannot match any record, so it is reported as not found.
fn parse_id(id: &str) -> Result<TodoId, TodoError> {
    id.parse().map_err(|_| TodoError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(title: &str) -> NewTodo {
        NewTodo {
            title: Some(title.to_string()),
            description: None,
        }
    }

    fn patch(json: &str) -> TodoPatch {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = TodoRepository::in_memory();
        let created = repo.create(new_todo("Comprar pan")).await.unwrap();
        assert!(!created.completed);

        let fetched = repo.get_by_id(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_without_title_is_rejected() {
        let repo = TodoRepository::in_memory();
        let err = repo.create(NewTodo::default()).await.unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_id_is_not_found() {
        let repo = TodoRepository::in_memory();
        assert_eq!(repo.get_by_id("xyz").await.unwrap_err(), TodoError::NotFound);
        assert_eq!(repo.delete("stats").await.unwrap_err(), TodoError::NotFound);
        assert_eq!(repo.complete("123").await.unwrap_err(), TodoError::NotFound);
    }

    #[tokio::test]
    async fn unused_id_is_not_found_for_every_operation() {
        let repo = TodoRepository::in_memory();
        let id = "660000000000000000000000";
        assert_eq!(repo.get_by_id(id).await.unwrap_err(), TodoError::NotFound);
        assert_eq!(
            repo.update(id, patch(r#"{"title":"x"}"#)).await.unwrap_err(),
            TodoError::NotFound
        );
        assert_eq!(repo.update(id, patch("{}")).await.unwrap_err(), TodoError::NotFound);
        assert_eq!(repo.delete(id).await.unwrap_err(), TodoError::NotFound);
        assert_eq!(repo.complete(id).await.unwrap_err(), TodoError::NotFound);
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let repo = TodoRepository::in_memory();
        let created = repo
            .create(NewTodo {
                title: Some("Original".to_string()),
                description: Some("detalle".to_string()),
            })
            .await
            .unwrap();
        let id = created.id.to_string();

        let updated = repo.update(&id, patch(r#"{"completed":true}"#)).await.unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "Original");
        assert_eq!(updated.description.as_deref(), Some("detalle"));

        let cleared = repo.update(&id, patch(r#"{"description":null}"#)).await.unwrap();
        assert_eq!(cleared.description, None);
        assert!(cleared.completed);
    }

    #[tokio::test]
    async fn empty_update_is_a_no_op() {
        let repo = TodoRepository::in_memory();
        let created = repo.create(new_todo("Igual")).await.unwrap();
        let same = repo.update(&created.id.to_string(), patch("{}")).await.unwrap();
        assert_eq!(same, created);
    }

    #[tokio::test]
    async fn complete_is_unconditional() {
        let repo = TodoRepository::in_memory();
        let created = repo.create(new_todo("Hacer")).await.unwrap();
        let id = created.id.to_string();

        assert!(repo.complete(&id).await.unwrap().completed);
        assert!(repo.complete(&id).await.unwrap().completed);
    }

    #[tokio::test]
    async fn deleted_ids_stay_gone() {
        let repo = TodoRepository::in_memory();
        let created = repo.create(new_todo("Efímera")).await.unwrap();
        let id = created.id.to_string();

        repo.delete(&id).await.unwrap();
        assert_eq!(repo.get_by_id(&id).await.unwrap_err(), TodoError::NotFound);

        let next = repo.create(new_todo("Nueva")).await.unwrap();
        assert_ne!(next.id, created.id);
    }

    #[tokio::test]
    async fn blank_search_term_is_rejected() {
        let repo = TodoRepository::in_memory();
        let err = repo.search_by_title("  ").await.unwrap_err();
        assert_eq!(err, TodoError::validation(SEARCH_TERM_REQUIRED));
    }

    #[tokio::test]
    async fn stats_count_completed_and_pending() {
        let repo = TodoRepository::in_memory();
        assert_eq!(repo.stats().await.unwrap(), TodoStats::from_counts(0, 0));

        let mut ids = Vec::new();
        for title in ["a", "b", "c", "d"] {
            ids.push(repo.create(new_todo(title)).await.unwrap().id.to_string());
        }
        repo.complete(&ids[0]).await.unwrap();
        repo.complete(&ids[1]).await.unwrap();
        repo.complete(&ids[2]).await.unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completion_rate, 75.0);
    }
}
