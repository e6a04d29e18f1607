//! PostgreSQL-backed `TodoGateway`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use todo_core::{NewTodo, StorageError, Todo, TodoGateway, TodoId};
use uuid::Uuid;

const COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct TodoRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgTodoGateway {
    pool: PgPool,
}

impl PgTodoGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and bring the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(StorageError::new)?;
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(StorageError::new)?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl TodoGateway for PgTodoGateway {
    async fn create(&self, todo: NewTodo) -> Result<Todo, StorageError> {
        let sql = format!(
            "INSERT INTO todos ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.completed)
            .bind(todo.created_at)
            .bind(todo.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::new)?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StorageError> {
        let sql = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::new)?;
        Ok(row.map(Todo::from))
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StorageError> {
        let sql = format!("SELECT {COLUMNS} FROM todos ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, TodoRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::new)?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn find_by_completed(&self, completed: bool) -> Result<Vec<Todo>, StorageError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM todos WHERE completed = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(completed)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::new)?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    /// Updates in place only; a row deleted since it was read stays deleted.
    async fn save(&self, todo: &Todo) -> Result<Option<Todo>, StorageError> {
        let sql = format!(
            "UPDATE todos SET title = $2, description = $3, completed = $4, updated_at = $5 \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(todo.id)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.completed)
            .bind(todo.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::new)?;
        Ok(row.map(Todo::from))
    }

    async fn delete(&self, id: TodoId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::new)?;
        Ok(())
    }
}
