//! One handler per todo endpoint.
//!
//! Handlers only extract the request, call `TodoRepository` and wrap the
//! result. Error-to-status mapping lives in `AppError`.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use todo_core::{NewTodo, Todo, TodoPatch, TodoRepository, TodoStats};

use crate::error::AppError;

pub const TODO_DELETED: &str = "Tarea eliminada correctamente";

/// `Json` extractor whose rejection is an `AppError`, so malformed bodies
/// get the same `{"error": ...}` shape as every other failure.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Path` extractor whose rejection is an `AppError`. An undecodable id is a
/// missing todo, like any other malformed id.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// `Query` extractor whose rejection is an `AppError`.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
}

/// # GET /health
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok".to_string(),
    })
}

/// # GET /api/todos
pub async fn list_todos(State(todos): State<TodoRepository>) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(todos.list_all().await?))
}

/// # POST /api/todos
pub async fn create_todo(
    State(todos): State<TodoRepository>,
    AppJson(input): AppJson<NewTodo>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let todo = todos.create(input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// # GET /api/todos/stats
pub async fn todo_stats(State(todos): State<TodoRepository>) -> Result<Json<TodoStats>, AppError> {
    Ok(Json(todos.stats().await?))
}

/// # GET /api/todos/search?title=<pattern>
/// A missing `title` is treated like a blank one and rejected by the
/// repository.
pub async fn search_todos(
    State(todos): State<TodoRepository>,
    AppQuery(params): AppQuery<SearchParams>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let pattern = params.title.unwrap_or_default();
    Ok(Json(todos.search_by_title(&pattern).await?))
}

/// # GET /api/todos/{id}
pub async fn get_todo(
    State(todos): State<TodoRepository>,
    AppPath(id): AppPath<String>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(todos.get_by_id(&id).await?))
}

/// # PUT /api/todos/{id}
pub async fn update_todo(
    State(todos): State<TodoRepository>,
    AppPath(id): AppPath<String>,
    AppJson(patch): AppJson<TodoPatch>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(todos.update(&id, patch).await?))
}

/// # DELETE /api/todos/{id}
pub async fn delete_todo(
    State(todos): State<TodoRepository>,
    AppPath(id): AppPath<String>,
) -> Result<Json<MessageBody>, AppError> {
    todos.delete(&id).await?;
    Ok(Json(MessageBody {
        message: TODO_DELETED.to_string(),
    }))
}

/// # PATCH /api/todos/{id}/complete
pub async fn complete_todo(
    State(todos): State<TodoRepository>,
    AppPath(id): AppPath<String>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(todos.complete(&id).await?))
}
