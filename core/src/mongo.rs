//! MongoDB-backed document store.
//!
//! # Design
//! Todos live in a single `todos` collection keyed by `ObjectId`. The stored
//! shape (`TodoDocument`) keeps native BSON types for `_id` and timestamps
//! and is converted into the client-facing `Todo` on the way out.
//! Timestamps are taken from `bson::DateTime::now()` so that values returned
//! on insert have the same millisecond precision as values read back later.

use async_trait::async_trait;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::error::TodoError;
use crate::store::{CountFilter, TodoStore};
use crate::types::{Todo, TodoChanges, TodoId, ValidNewTodo};

pub const COLLECTION_NAME: &str = "todos";
pub const DEFAULT_DATABASE: &str = "todo_app";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    completed: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    updated_at: DateTime<Utc>,
}

impl TodoDocument {
    fn from_todo(todo: &Todo) -> Self {
        Self {
            id: todo.id.object_id(),
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: todo.completed,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }

    fn into_todo(self) -> Todo {
        Todo {
            id: self.id.into(),
            title: self.title,
            description: self.description,
            completed: self.completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn now() -> DateTime<Utc> {
    bson::DateTime::now().to_chrono()
}

fn by_id(id: TodoId) -> Document {
    doc! { "_id": id.object_id() }
}

/// Builds the `$set` / `$unset` update for a change set.
fn update_document(changes: &TodoChanges, updated_at: DateTime<Utc>) -> Document {
    let mut set = doc! { "updatedAt": bson::DateTime::from_chrono(updated_at) };
    let mut unset = Document::new();

    if let Some(title) = &changes.title {
        set.insert("title", title.as_str());
    }
    match &changes.description {
        Some(Some(description)) => {
            set.insert("description", description.as_str());
        }
        Some(None) => {
            unset.insert("description", "");
        }
        None => {}
    }
    if let Some(completed) = changes.completed {
        set.insert("completed", completed);
    }

    let mut update = doc! { "$set": set };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    update
}

#[derive(Debug, Clone)]
pub struct MongoStore {
    collection: Collection<TodoDocument>,
}

impl MongoStore {
    /// Connects to `uri` and verifies the server answers a `ping`.
    ///
    /// The database is `database` if given, otherwise the one named in the
    /// URI, otherwise `DEFAULT_DATABASE`.
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, TodoError> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;
        let db = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };
        db.run_command(doc! { "ping": 1 }, None).await?;
        tracing::info!(database = db.name(), "connected to MongoDB");
        Ok(Self::new(&db))
    }

    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_NAME),
        }
    }

    async fn collect(&self, filter: Document) -> Result<Vec<Todo>, TodoError> {
        let documents: Vec<TodoDocument> = self
            .collection
            .find(filter, None)
            .await?
            .try_collect()
            .await?;
        Ok(documents.into_iter().map(TodoDocument::into_todo).collect())
    }
}

#[async_trait]
impl TodoStore for MongoStore {
    async fn find_all(&self) -> Result<Vec<Todo>, TodoError> {
        self.collect(doc! {}).await
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoError> {
        let document = self.collection.find_one(by_id(id), None).await?;
        Ok(document.map(TodoDocument::into_todo))
    }

    async fn insert(&self, input: ValidNewTodo) -> Result<Todo, TodoError> {
        let todo = Todo::new(TodoId::generate(), input, now());
        self.collection
            .insert_one(TodoDocument::from_todo(&todo), None)
            .await?;
        Ok(todo)
    }

    async fn update(&self, id: TodoId, changes: TodoChanges) -> Result<Option<Todo>, TodoError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let document = self
            .collection
            .find_one_and_update(by_id(id), update_document(&changes, now()), options)
            .await?;
        Ok(document.map(TodoDocument::into_todo))
    }

    async fn delete(&self, id: TodoId) -> Result<bool, TodoError> {
        let result = self.collection.delete_one(by_id(id), None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn find_by_title(&self, pattern: &str) -> Result<Vec<Todo>, TodoError> {
        self.collect(doc! { "title": { "$regex": pattern, "$options": "i" } })
            .await
    }

    async fn count(&self, filter: CountFilter) -> Result<u64, TodoError> {
        let filter = match filter {
            CountFilter::All => doc! {},
            CountFilter::Completed => doc! { "completed": true },
        };
        Ok(self.collection.count_documents(filter, None).await?)
    }
}
