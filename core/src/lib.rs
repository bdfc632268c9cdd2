//! Domain model and data access for the todo service.
//!
//! # Overview
//! `TodoRepository` exposes the logical operations the HTTP layer needs
//! (list, get, create, update, delete, complete, search, stats) and returns
//! `Result<_, TodoError>` so callers can match on the error kind.
//!
//! # Design
//! - The repository owns an explicit `Arc<dyn TodoStore>` handle; there is no
//!   global connection.
//! - `TodoStore` has two implementations: `MongoStore` for production and
//!   `InMemoryStore` for development and tests.
//! - Request payloads are validated into store input types before any store
//!   call, so a persisted title is never blank.
//! - Malformed ids are treated as not found.

pub mod error;
pub mod memory;
pub mod mongo;
pub mod repository;
pub mod store;
pub mod types;

pub use error::{TodoError, NOT_FOUND_MESSAGE};
pub use memory::InMemoryStore;
pub use mongo::MongoStore;
pub use repository::TodoRepository;
pub use store::{CountFilter, TodoStore};
pub use types::{NewTodo, Todo, TodoChanges, TodoId, TodoPatch, TodoStats, ValidNewTodo};
