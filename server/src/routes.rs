//! Route table for `/api/todos`.
//!
//! `stats` and `search` are fixed segments and must never be taken as an
//! `{id}`. axum's router always prefers a static segment over a parameter in
//! the same position; the fixed routes are still listed first so the table
//! reads in match order.

use axum::{
    routing::{get, patch},
    Router,
};
use todo_core::TodoRepository;

use crate::handlers::{
    complete_todo, create_todo, delete_todo, get_todo, list_todos, search_todos, todo_stats,
    update_todo,
};

pub const TODOS_PATH: &str = "/api/todos";

pub fn todo_routes() -> Router<TodoRepository> {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/stats", get(todo_stats))
        .route("/search", get(search_todos))
        .route("/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/{id}/complete", patch(complete_todo))
}
