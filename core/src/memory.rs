//! Process-local document store.
//!
//! Keeps todos in insertion order behind a `tokio::sync::RwLock`. Used for
//! development (`STORAGE_MODE=memory`) and by the test suites. The lock is
//! held only for the in-memory operation itself.

use async_trait::async_trait;
use chrono::Utc;
use regex::RegexBuilder;
use tokio::sync::RwLock;

use crate::error::TodoError;
use crate::store::{CountFilter, TodoStore};
use crate::types::{Todo, TodoChanges, TodoId, ValidNewTodo};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    todos: RwLock<Vec<Todo>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.todos.read().await.clone())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|todo| todo.id == id).cloned())
    }

    async fn insert(&self, input: ValidNewTodo) -> Result<Todo, TodoError> {
        let todo = Todo::new(TodoId::generate(), input, Utc::now());
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: TodoId, changes: TodoChanges) -> Result<Option<Todo>, TodoError> {
        let mut todos = self.todos.write().await;
        let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) else {
            return Ok(None);
        };
        todo.apply(&changes, Utc::now());
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: TodoId) -> Result<bool, TodoError> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|todo| todo.id != id);
        Ok(todos.len() < before)
    }

    async fn find_by_title(&self, pattern: &str) -> Result<Vec<Todo>, TodoError> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .filter(|todo| regex.is_match(&todo.title))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: CountFilter) -> Result<u64, TodoError> {
        let todos = self.todos.read().await;
        let count = match filter {
            CountFilter::All => todos.len(),
            CountFilter::Completed => todos.iter().filter(|todo| todo.completed).count(),
        };
        Ok(count as u64)
    }
}
