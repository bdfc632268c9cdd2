//! Entity model and request payloads for the todo resource.
//!
//! # Design
//! Request bodies are deserialized into dedicated payload types (`NewTodo`,
//! `TodoPatch`) and then validated into the types the store accepts
//! (`ValidNewTodo`, `TodoChanges`). A store can therefore never be handed a
//! blank title. `TodoPatch` keeps a presence flag per field so that an
//! omitted field and an explicit `null` are handled differently.

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TodoError;

pub const TITLE_REQUIRED: &str = "El título es obligatorio";
pub const TITLE_EMPTY: &str = "El título no puede estar vacío";
pub const COMPLETED_NOT_BOOLEAN: &str = "El campo completed debe ser verdadero o falso";

/// Store-generated identifier of a todo, rendered as 24 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoId(ObjectId);

impl TodoId {
    /// Generates a fresh id. Ids are never reused.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for TodoId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for TodoId {
    type Err = bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self)
    }
}

impl TryFrom<String> for TodoId {
    type Error = bson::oid::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TodoId> for String {
    fn from(id: TodoId) -> Self {
        id.0.to_hex()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

/// A persisted todo as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: TodoId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Builds a not-yet-completed todo from validated input.
    pub fn new(id: TodoId, input: ValidNewTodo, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the present fields of `changes`. `updated_at` moves only if
    /// there was something to apply.
    pub fn apply(&mut self, changes: &TodoChanges, now: DateTime<Utc>) {
        if changes.is_empty() {
            return;
        }
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        self.updated_at = now;
    }
}

/// Request payload for creating a todo. Unknown fields are ignored, so a
/// client-supplied `completed` has no effect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTodo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTodo {
    pub fn validate(self) -> Result<ValidNewTodo, TodoError> {
        match self.title {
            Some(title) if !title.trim().is_empty() => Ok(ValidNewTodo {
                title,
                description: self.description,
            }),
            _ => Err(TodoError::validation(TITLE_REQUIRED)),
        }
    }
}

/// Creation input whose title is known to be non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNewTodo {
    pub title: String,
    pub description: Option<String>,
}

/// Request payload for a partial update.
///
/// Outer `None` means the field was absent; `Some(None)` means it was an
/// explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub completed: Option<Option<bool>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TodoPatch {
    pub fn validate(self) -> Result<TodoChanges, TodoError> {
        let title = match self.title {
            None => None,
            Some(Some(title)) if !title.trim().is_empty() => Some(title),
            Some(_) => return Err(TodoError::validation(TITLE_EMPTY)),
        };
        let completed = match self.completed {
            None => None,
            Some(Some(completed)) => Some(completed),
            Some(None) => return Err(TodoError::validation(COMPLETED_NOT_BOOLEAN)),
        };
        Ok(TodoChanges {
            title,
            description: self.description,
            completed,
        })
    }
}

/// Validated field changes. `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    /// The change set behind the complete operation.
    pub fn mark_completed() -> Self {
        Self {
            completed: Some(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

/// Aggregate counts over all todos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub completion_rate: f64,
}

impl TodoStats {
    pub fn from_counts(total: u64, completed: u64) -> Self {
        let completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Self {
            total,
            completed,
            pending: total.saturating_sub(completed),
            completion_rate,
        }
    }
}
