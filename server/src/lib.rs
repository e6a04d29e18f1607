//! HTTP surface of the todo service.
//!
//! Routes live under `/api/todos`. Handlers decode the request, validate
//! bodies, call `TodoService` and let `ApiError` shape every failure.

pub mod config;
pub mod error;
pub mod postgres;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use todo_core::{validate_request, TodoId, TodoRequest, TodoResponse, TodoService};
use tracing::instrument;

pub use config::AppConfig;
pub use error::ApiError;
pub use postgres::PgTodoGateway;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub completed: Option<bool>,
}

pub fn app(service: TodoService) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/{id}",
            get(get_todo).post(update_todo).put(update_todo).delete(delete_todo),
        )
        .route("/api/todos/{id}/toggle", patch(toggle_todo))
        .with_state(service)
}

pub async fn run(listener: TcpListener, service: TodoService) -> Result<(), std::io::Error> {
    axum::serve(listener, app(service)).await
}

/// Decode and validate a request body before it reaches the service.
fn validated(body: Result<Json<TodoRequest>, JsonRejection>) -> Result<TodoRequest, ApiError> {
    let Json(request) = body?;
    validate_request(&request).map_err(ApiError::Validation)?;
    Ok(request)
}

#[instrument(level = "debug", skip_all)]
async fn list_todos(
    State(service): State<TodoService>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<TodoResponse>>, ApiError> {
    let Query(params) = params?;
    let todos = match params.completed {
        Some(completed) => service.list_by_status(completed).await?,
        None => service.list_all().await?,
    };
    Ok(Json(todos))
}

#[instrument(level = "debug", skip_all)]
async fn create_todo(
    State(service): State<TodoService>,
    body: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError> {
    let request = validated(body)?;
    let todo = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

#[instrument(level = "debug", skip_all)]
async fn get_todo(
    State(service): State<TodoService>,
    id: Result<Path<TodoId>, PathRejection>,
) -> Result<Json<TodoResponse>, ApiError> {
    let Path(id) = id?;
    Ok(Json(service.get_by_id(id).await?))
}

#[instrument(level = "debug", skip_all)]
async fn update_todo(
    State(service): State<TodoService>,
    id: Result<Path<TodoId>, PathRejection>,
    body: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<Json<TodoResponse>, ApiError> {
    let Path(id) = id?;
    let request = validated(body)?;
    Ok(Json(service.update(id, request).await?))
}

#[instrument(level = "debug", skip_all)]
async fn toggle_todo(
    State(service): State<TodoService>,
    id: Result<Path<TodoId>, PathRejection>,
) -> Result<Json<TodoResponse>, ApiError> {
    let Path(id) = id?;
    Ok(Json(service.toggle(id).await?))
}

#[instrument(level = "debug", skip_all)]
async fn delete_todo(
    State(service): State<TodoService>,
    id: Result<Path<TodoId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

