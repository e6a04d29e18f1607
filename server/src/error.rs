//! Translation of domain and decoding failures into JSON error responses.
//!
//! Every handler returns `Result<_, ApiError>`; extractor rejections convert
//! into `ApiError` too, so the client always receives the same body shape:
//! `{status, message, timestamp, errors?}`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use todo_core::{FieldErrors, TodoError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    /// Request body failed declared constraints.
    Validation(FieldErrors),
    /// Body, path or query could not be decoded at all.
    BadRequest(String),
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_body(self) -> ErrorBody {
        let status = status_name(self.status_code());
        let (message, errors) = match self {
            ApiError::Validation(errors) => ("Validation error".to_string(), Some(errors)),
            ApiError::NotFound(message) | ApiError::BadRequest(message) | ApiError::Internal(message) => {
                (message, None)
            }
        };
        ErrorBody {
            status,
            message,
            timestamp: Utc::now(),
            errors,
        }
    }
}

fn status_name(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        _ => "INTERNAL_SERVER_ERROR",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Internal(message) = &self {
            tracing::error!(%message, "request failed");
        }
        (status, Json(self.into_body())).into_response()
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::NotFound(_) => ApiError::NotFound(err.to_string()),
            TodoError::Storage(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
