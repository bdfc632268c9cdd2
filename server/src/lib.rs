//! HTTP front end for the todo service.
//!
//! # Overview
//! `app` builds the complete router: the todo routes under `/api/todos`, the
//! `/health` liveness probe, a JSON 404 for anything unmatched, and a panic
//! guard that turns any unhandled failure into a generic 500.
//!
//! # Design
//! - The only shared state is the `TodoRepository` passed to `app`; it is
//!   built once at startup and cloned into each request.
//! - Store failures are ordinary `AppError` values. Only panics reach the
//!   panic guard, which logs the payload and never exposes it.

use std::any::Any;
use std::future::Future;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use todo_core::TodoRepository;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

pub use config::{Config, ConfigError, StoreConfig};
pub use error::{AppError, ErrorBody};

use error::{INTERNAL_ERROR, ROUTE_NOT_FOUND};

pub fn app(todos: TodoRepository) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            &format!("{}/", routes::TODOS_PATH),
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .nest(routes::TODOS_PATH, routes::todo_routes())
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .with_state(todos)
        .layer(CatchPanicLayer::custom(internal_error))
        .layer(TraceLayer::new_for_http())
}

/// Serves `app(todos)` on `listener` until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, todos: TodoRepository, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(todos))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn route_not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new(ROUTE_NOT_FOUND)))
}

fn internal_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else {
        "non-string panic payload"
    };
    tracing::error!(panic = detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(INTERNAL_ERROR)),
    )
        .into_response()
}
