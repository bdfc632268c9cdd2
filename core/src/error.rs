//! Error taxonomy for todo operations.
//!
//! # Design
//! Every data-access call returns `Result<_, TodoError>`. The three variants
//! are the only outcomes a caller has to distinguish: the input was rejected,
//! the id does not resolve to a live record, or the store itself failed.
//! Store-specific errors are flattened into `Store` with their message so the
//! driver types never leak past this crate.

use thiserror::Error;

/// Message returned for any id that does not resolve to a live todo.
pub const NOT_FOUND_MESSAGE: &str = "Tarea no encontrada";

/// Errors returned by `TodoRepository` and `TodoStore` operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoError {
    /// Missing or invalid required input.
    #[error("{0}")]
    Validation(String),

    /// The id is malformed or does not match a live record.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    /// The underlying document store failed.
    #[error("{0}")]
    Store(String),
}

impl TodoError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<mongodb::error::Error> for TodoError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<regex::Error> for TodoError {
    fn from(err: regex::Error) -> Self {
        Self::Store(err.to_string())
    }
}
