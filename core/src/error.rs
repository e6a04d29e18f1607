//! Error types for the todo domain.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the HTTP boundary maps it to
//! 404. Every gateway failure is carried as `Storage` with the underlying
//! error as its source; the boundary reports it as an unexpected failure.

use crate::types::TodoId;

/// Failure raised by a `TodoGateway` implementation.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct StorageError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl StorageError {
    pub fn new<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            source: source.into(),
        }
    }
}

/// Errors returned by `TodoService` operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// No todo with this id exists.
    #[error("Todo not found with id: {0}")]
    NotFound(TodoId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
