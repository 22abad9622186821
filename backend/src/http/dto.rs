//! Data Transfer Objects for the HTTP API.
//!
//! Responses reuse the domain types from [`crate::api`], which already
//! serialize to the wire shape.

use serde::{Deserialize, Serialize};

pub use crate::api::{Todo, TodoPatch as UpdateTodoRequest};
use crate::api::NewTodo;

/// Request body for creating a todo.
///
/// `title` is optional here only so that a missing title can be reported as a
/// 400 with the standard error body instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateTodoRequest {
    /// Convert into a [`NewTodo`], or `None` when the title is missing.
    pub fn into_new_todo(self) -> Option<NewTodo> {
        let title = self.title?;
        Some(NewTodo {
            title,
            description: self.description,
        })
    }
}

/// Response body for a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTodoResponse {
    pub success: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the crate serving the request
    pub version: String,
    /// Database connection status
    pub database: String,
}
