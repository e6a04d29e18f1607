//! Todo entity and the wire DTOs built from it.
//!
//! # Design
//! `Todo` is the persisted shape owned by the gateway. `TodoRequest` and
//! `TodoResponse` exist only at the HTTP boundary and are built per request.
//! Conversions between them live here so the service never assembles a
//! response field by field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::not_blank;

pub type TodoId = Uuid;

/// A persisted todo record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Overwrite the user-editable fields and stamp `updated_at`.
    pub fn apply(&mut self, request: TodoRequest, now: DateTime<Utc>) {
        self.title = request.title;
        self.description = request.description;
        self.completed = request.completed;
        self.touch(now);
    }

    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.touch(now);
    }

    /// `updated_at` never precedes `created_at`, even if `now` comes from a
    /// clock that is behind the one that created the record.
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// A todo that has not been stored yet, so it has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewTodo {
    pub fn from_request(request: TodoRequest, now: DateTime<Utc>) -> Self {
        Self {
            title: request.title,
            description: request.description,
            completed: request.completed,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_todo(self, id: TodoId) -> Todo {
        Todo {
            id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Request payload for creating or replacing a todo.
///
/// A missing or null `title` decodes as an empty string so it is reported by
/// validation rather than rejected by the JSON decoder. A null `completed`
/// means false.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TodoRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(
        custom = "not_blank",
        length(min = 3, max = 100, message = "Title must be between 3 and 100 characters")
    )]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read-only projection of a `Todo` returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}
