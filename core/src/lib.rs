//! Domain core for the todo service.
//!
//! # Overview
//! Holds everything below the HTTP boundary: the `Todo` entity and its wire
//! DTOs, request validation, the persistence gateway abstraction with an
//! in-memory implementation, and `TodoService`, which applies the business
//! rules (not-found detection, timestamps, toggling) on top of a gateway.
//!
//! # Design
//! - The service takes `Arc<dyn TodoGateway>` at construction; nothing is
//!   injected implicitly.
//! - Validation is a separate step the boundary runs before calling the
//!   service, producing a field-to-message map.
//! - No HTTP or database types appear here; the server crate owns both.

pub mod clock;
pub mod error;
pub mod gateway;
pub mod service;
pub mod types;
pub mod validation;

pub use error::{StorageError, TodoError};
pub use gateway::{InMemoryTodoGateway, TodoGateway};
pub use service::TodoService;
pub use types::{NewTodo, Todo, TodoId, TodoRequest, TodoResponse};
pub use validation::{validate_request, FieldErrors};
