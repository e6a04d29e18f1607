//! Business operations on todos.
//!
//! # Design
//! `TodoService` holds the gateway and a clock and nothing else, so it is
//! cheap to clone into every request handler. Each mutating operation is
//! find, mutate, then an explicit `save`; the gateway is never relied on to
//! flush in-place changes. Input is assumed valid: validation happens at the
//! HTTP boundary before any method here is called.

use std::sync::Arc;

use tracing::info;

use crate::clock::Clock;
use crate::error::TodoError;
use crate::gateway::TodoGateway;
use crate::types::{NewTodo, Todo, TodoId, TodoRequest, TodoResponse};

#[derive(Clone)]
pub struct TodoService {
    gateway: Arc<dyn TodoGateway>,
    clock: Arc<Clock>,
}

impl TodoService {
    pub fn new(gateway: Arc<dyn TodoGateway>) -> Self {
        Self {
            gateway,
            clock: Arc::new(Clock::new()),
        }
    }

    /// All todos, newest first.
    pub async fn list_all(&self) -> Result<Vec<TodoResponse>, TodoError> {
        let todos = self.gateway.find_all().await?;
        Ok(todos.into_iter().map(TodoResponse::from).collect())
    }

    /// Todos whose `completed` flag equals `completed`, newest first.
    pub async fn list_by_status(&self, completed: bool) -> Result<Vec<TodoResponse>, TodoError> {
        let todos = self.gateway.find_by_completed(completed).await?;
        Ok(todos.into_iter().map(TodoResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: TodoId) -> Result<TodoResponse, TodoError> {
        self.find(id).await.map(TodoResponse::from)
    }

    pub async fn create(&self, request: TodoRequest) -> Result<TodoResponse, TodoError> {
        let todo = NewTodo::from_request(request, self.clock.tick());
        let saved = self.gateway.create(todo).await?;
        info!(id = %saved.id, "created todo");
        Ok(saved.into())
    }

    /// Replace title, description and completed flag of an existing todo.
    pub async fn update(&self, id: TodoId, request: TodoRequest) -> Result<TodoResponse, TodoError> {
        let mut todo = self.find(id).await?;
        todo.apply(request, self.clock.tick());
        let saved = self.store(&todo).await?;
        info!(id = %saved.id, "updated todo");
        Ok(saved.into())
    }

    pub async fn toggle(&self, id: TodoId) -> Result<TodoResponse, TodoError> {
        let mut todo = self.find(id).await?;
        todo.toggle(self.clock.tick());
        let saved = self.store(&todo).await?;
        info!(id = %saved.id, completed = saved.completed, "toggled todo");
        Ok(saved.into())
    }

    pub async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        let todo = self.find(id).await?;
        self.gateway.delete(todo.id).await?;
        info!(id = %id, "deleted todo");
        Ok(())
    }

    async fn find(&self, id: TodoId) -> Result<Todo, TodoError> {
        self.gateway
            .find_by_id(id)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    /// The record may have been deleted since it was read.
    async fn store(&self, todo: &Todo) -> Result<Todo, TodoError> {
        self.gateway
            .save(todo)
            .await?
            .ok_or(TodoError::NotFound(todo.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::gateway::InMemoryTodoGateway;
    use async_trait::async_trait;
    use uuid::Uuid;

    fn service() -> TodoService {
        TodoService::new(Arc::new(InMemoryTodoGateway::new()))
    }

    fn request(title: &str, completed: bool) -> TodoRequest {
        TodoRequest {
            title: title.to_string(),
            description: None,
            completed,
        }
    }

    /// Gateway whose every call fails, standing in for a lost database.
    struct BrokenGateway;

    #[async_trait]
    impl TodoGateway for BrokenGateway {
        async fn create(&self, _: NewTodo) -> Result<Todo, StorageError> {
            Err(StorageError::new("database unavailable"))
        }
        async fn find_by_id(&self, _: TodoId) -> Result<Option<Todo>, StorageError> {
            Err(StorageError::new("database unavailable"))
        }
        async fn find_all(&self) -> Result<Vec<Todo>, StorageError> {
            Err(StorageError::new("database unavailable"))
        }
        async fn find_by_completed(&self, _: bool) -> Result<Vec<Todo>, StorageError> {
            Err(StorageError::new("database unavailable"))
        }
        async fn save(&self, _: &Todo) -> Result<Option<Todo>, StorageError> {
            Err(StorageError::new("database unavailable"))
        }
        async fn delete(&self, _: TodoId) -> Result<(), StorageError> {
            Err(StorageError::new("database unavailable"))
        }
    }

    /// Deletes every todo right after it has been looked up, as if a DELETE
    /// request landed between the read and the write of a mutation.
    struct RacingDeleteGateway {
        inner: InMemoryTodoGateway,
    }

    #[async_trait]
    impl TodoGateway for RacingDeleteGateway {
        async fn create(&self, todo: NewTodo) -> Result<Todo, StorageError> {
            self.inner.create(todo).await
        }
        async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StorageError> {
            let found = self.inner.find_by_id(id).await?;
            self.inner.delete(id).await?;
            Ok(found)
        }
        async fn find_all(&self) -> Result<Vec<Todo>, StorageError> {
            self.inner.find_all().await
        }
        async fn find_by_completed(&self, completed: bool) -> Result<Vec<Todo>, StorageError> {
            self.inner.find_by_completed(completed).await
        }
        async fn save(&self, todo: &Todo) -> Result<Option<Todo>, StorageError> {
            self.inner.save(todo).await
        }
        async fn delete(&self, id: TodoId) -> Result<(), StorageError> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn create_echoes_input_with_equal_timestamps() {
        let created = service()
            .create(TodoRequest {
                title: "Buy milk".to_string(),
                description: Some("2 litres".to_string()),
                completed: false,
            })
            .await
            .unwrap();
        assert_eq!(created.title, "Buy milk");
        assert_eq!(created.description.as_deref(), Some("2 litres"));
        assert!(!created.completed);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn get_by_id_returns_created_todo() {
        let service = service();
        let created = service.create(request("Walk dog", false)).await.unwrap();
        let fetched = service.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn missing_id_is_not_found_for_every_operation() {
        let service = service();
        let id = Uuid::new_v4();
        assert!(matches!(service.get_by_id(id).await, Err(TodoError::NotFound(missing)) if missing == id));
        assert!(matches!(
            service.update(id, request("Nope", false)).await,
            Err(TodoError::NotFound(_))
        ));
        assert!(matches!(service.toggle(id).await, Err(TodoError::NotFound(_))));
        assert!(matches!(service.delete(id).await, Err(TodoError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_persists_changes_and_refreshes_updated_at() {
        let service = service();
        let created = service.create(request("Draft", false)).await.unwrap();
        let updated = service
            .update(
                created.id,
                TodoRequest {
                    title: "Final".to_string(),
                    description: Some("ready".to_string()),
                    completed: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);

        let stored = service.get_by_id(created.id).await.unwrap();
        assert_eq!(stored, updated);
        assert_eq!(stored.title, "Final");
        assert_eq!(stored.description.as_deref(), Some("ready"));
        assert!(stored.completed);
    }

    #[tokio::test]
    async fn toggle_twice_restores_status_and_advances_updated_at() {
        let service = service();
        let created = service.create(request("Water plants", false)).await.unwrap();

        let first = service.toggle(created.id).await.unwrap();
        assert!(first.completed);
        assert!(first.updated_at > created.updated_at);

        let second = service.toggle(created.id).await.unwrap();
        assert!(!second.completed);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(second.created_at, created.created_at);
    }

    #[tokio::test]
    async fn delete_removes_only_the_target() {
        let service = service();
        let keep = service.create(request("Keep me", false)).await.unwrap();
        let doomed = service.create(request("Drop me", false)).await.unwrap();

        service.delete(doomed.id).await.unwrap();

        assert!(matches!(service.get_by_id(doomed.id).await, Err(TodoError::NotFound(_))));
        let remaining = service.list_all().await.unwrap();
        assert_eq!(remaining, vec![keep]);
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let service = service();
        for title in ["first", "second", "third"] {
            service.create(request(title, false)).await.unwrap();
        }
        let titles: Vec<String> = service
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.title)
            .collect();
        assert_eq!(titles, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn status_lists_partition_list_all() {
        let service = service();
        service.create(request("done one", true)).await.unwrap();
        service.create(request("open one", false)).await.unwrap();
        service.create(request("done two", true)).await.unwrap();

        let done = service.list_by_status(true).await.unwrap();
        let open = service.list_by_status(false).await.unwrap();
        assert!(done.iter().all(|todo| todo.completed));
        assert!(open.iter().all(|todo| !todo.completed));
        assert_eq!(
            done.iter().map(|todo| todo.title.as_str()).collect::<Vec<_>>(),
            ["done two", "done one"]
        );

        let mut union: Vec<TodoResponse> = done.into_iter().chain(open).collect();
        union.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        assert_eq!(union, service.list_all().await.unwrap());
    }

    #[tokio::test]
    async fn mutation_after_concurrent_delete_is_not_found() {
        let inner = InMemoryTodoGateway::new();
        let service = TodoService::new(Arc::new(RacingDeleteGateway { inner: inner.clone() }));

        let toggled = service.create(request("Buy milk", false)).await.unwrap();
        assert!(matches!(
            service.toggle(toggled.id).await,
            Err(TodoError::NotFound(id)) if id == toggled.id
        ));

        let updated = service.create(request("Walk dog", false)).await.unwrap();
        assert!(matches!(
            service.update(updated.id, request("Walk cat", true)).await,
            Err(TodoError::NotFound(id)) if id == updated.id
        ));

        assert!(inner.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_failures_surface_as_storage_errors() {
        let service = TodoService::new(Arc::new(BrokenGateway));
        let err = service.list_all().await.unwrap_err();
        assert!(matches!(err, TodoError::Storage(_)));
        assert_eq!(err.to_string(), "database unavailable");
        assert!(matches!(
            service.create(request("Buy milk", false)).await,
            Err(TodoError::Storage(_))
        ));
        assert!(matches!(service.toggle(Uuid::nil()).await, Err(TodoError::Storage(_))));
    }
}
