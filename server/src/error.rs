//! HTTP error responses.
//!
//! # Design
//! `AppError` is the error type of every handler. Its `IntoResponse` impl is
//! the single place where error kinds become status codes, and it matches
//! exhaustively so a new `TodoError` variant cannot be silently mapped.
//! Every error body has the shape `{"error": "<message>"}`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use todo_core::{TodoError, NOT_FOUND_MESSAGE};

pub const ROUTE_NOT_FOUND: &str = "Ruta no encontrada";
pub const INTERNAL_ERROR: &str = "Error interno del servidor";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Todo(#[from] TodoError),

    /// The request body was missing or was not the expected JSON.
    #[error("Cuerpo de la petición inválido: {0}")]
    InvalidBody(String),

    /// The query string could not be read into the expected parameters.
    #[error("Parámetros de consulta inválidos: {0}")]
    InvalidQuery(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

/// An id segment that cannot even be decoded names no todo.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "unreadable path parameter");
        Self::Todo(TodoError::NotFound)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Todo(TodoError::Validation(message)) => (StatusCode::BAD_REQUEST, message),
            AppError::Todo(TodoError::NotFound) => {
                (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string())
            }
            AppError::Todo(TodoError::Store(message)) => {
                tracing::error!(error = %message, "store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            err @ (AppError::InvalidBody(_) | AppError::InvalidQuery(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}
