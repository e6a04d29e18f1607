//! Persistence gateway for todo records.
//!
//! # Design
//! The service depends on `dyn TodoGateway` so the binary can pick PostgreSQL
//! or memory at start-up and tests can substitute a fake. Listing methods
//! return records newest first (`created_at` descending, then `id`
//! descending) regardless of the backing store.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StorageError;
use crate::types::{NewTodo, Todo, TodoId};

#[async_trait]
pub trait TodoGateway: Send + Sync + 'static {
    /// Store a new record and assign its id.
    async fn create(&self, todo: NewTodo) -> Result<Todo, StorageError>;

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StorageError>;

    async fn find_all(&self) -> Result<Vec<Todo>, StorageError>;

    async fn find_by_completed(&self, completed: bool) -> Result<Vec<Todo>, StorageError>;

    /// Overwrite the existing record with `todo.id`. Returns `None` when no
    /// such record exists; a deleted todo is never written back.
    async fn save(&self, todo: &Todo) -> Result<Option<Todo>, StorageError>;

    /// Remove the record. Removing an absent id succeeds.
    async fn delete(&self, id: TodoId) -> Result<(), StorageError>;
}

/// Listing order shared by every gateway.
pub fn newest_first(a: &Todo, b: &Todo) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

pub type Db = Arc<RwLock<HashMap<TodoId, Todo>>>;

/// Gateway backed by a process-local map. Used when no database is configured
/// and in tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoGateway {
    db: Db,
}

impl InMemoryTodoGateway {
    pub fn new() -> Self {
        Self::default()
    }

    async fn collect(&self, keep: impl Fn(&Todo) -> bool + Send) -> Vec<Todo> {
        let todos = self.db.read().await;
        let mut matching: Vec<Todo> = todos.values().filter(|todo| keep(*todo)).cloned().collect();
        matching.sort_by(newest_first);
        matching
    }
}

#[async_trait]
impl TodoGateway for InMemoryTodoGateway {
    async fn create(&self, todo: NewTodo) -> Result<Todo, StorageError> {
        let mut todos = self.db.write().await;
        let mut id = Uuid::new_v4();
        while todos.contains_key(&id) {
            id = Uuid::new_v4();
        }
        let todo = todo.into_todo(id);
        todos.insert(id, todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StorageError> {
        Ok(self.db.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StorageError> {
        Ok(self.collect(|_| true).await)
    }

    async fn find_by_completed(&self, completed: bool) -> Result<Vec<Todo>, StorageError> {
        Ok(self.collect(|todo| todo.completed == completed).await)
    }

    async fn save(&self, todo: &Todo) -> Result<Option<Todo>, StorageError> {
        let mut todos = self.db.write().await;
        Ok(todos.get_mut(&todo.id).map(|stored| {
            *stored = todo.clone();
            stored.clone()
        }))
    }

    async fn delete(&self, id: TodoId) -> Result<(), StorageError> {
        self.db.write().await.remove(&id);
        Ok(())
    }
}
