//! Document-level operations the data access layer relies on.
//!
//! # Design
//! `TodoStore` is the seam between `TodoRepository` and a concrete document
//! database. Implementations receive already-validated input and typed ids;
//! they only translate each call into a store query. Missing records are
//! reported as `Ok(None)` / `Ok(false)` and turned into `TodoError::NotFound`
//! by the repository.

use async_trait::async_trait;

use crate::error::TodoError;
use crate::types::{Todo, TodoChanges, TodoId, ValidNewTodo};

/// Which documents `TodoStore::count` should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFilter {
    All,
    Completed,
}

#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    /// All todos in store order.
    async fn find_all(&self) -> Result<Vec<Todo>, TodoError>;

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoError>;

    /// Persists a new todo with `completed = false` and returns it.
    async fn insert(&self, input: ValidNewTodo) -> Result<Todo, TodoError>;

    /// Applies `changes` and returns the updated document, or `None` if no
    /// document has this id.
    async fn update(&self, id: TodoId, changes: TodoChanges) -> Result<Option<Todo>, TodoError>;

    /// Returns whether a document was removed.
    async fn delete(&self, id: TodoId) -> Result<bool, TodoError>;

    /// Case-insensitive regular-expression match on `title`.
    async fn find_by_title(&self, pattern: &str) -> Result<Vec<Todo>, TodoError>;

    async fn count(&self, filter: CountFilter) -> Result<u64, TodoError>;
}
