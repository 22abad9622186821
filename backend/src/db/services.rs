//! High-level todo service layer.
//!
//! Repository-agnostic operations that work with any [`TodoRepository`]. This
//! is where input is validated and where an empty result from an id-scoped
//! query becomes a `NotFound` error, so both backends behave the same way.
//!
//! # Usage
//!
//! ```no_run
//! use todo_backend::api::NewTodo;
//! use todo_backend::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!
//!     let todo = services::create_todo(&repo, NewTodo::new("Buy milk")).await?;
//!     let todos = services::list_todos(&repo).await?;
//!     println!("Created {}, {} todos in total", todo.id, todos.len());
//!
//!     Ok(())
//! }
//! ```

use log::{debug, info};

use super::repository::{ErrorContext, RepositoryError, RepositoryResult, TodoRepository};
use crate::api::{NewTodo, Todo, TodoId, TodoPatch};

/// Message returned to clients when an id matches no row.
pub const TODO_NOT_FOUND: &str = "Todo not found";

fn not_found(operation: &str, id: TodoId) -> RepositoryError {
    RepositoryError::not_found_with_context(
        TODO_NOT_FOUND,
        ErrorContext::new(operation)
            .with_entity("todo")
            .with_entity_id(id),
    )
}

fn validate_title(operation: &str, title: &str) -> RepositoryResult<()> {
    if title.trim().is_empty() {
        return Err(RepositoryError::validation_with_context(
            "title must not be empty",
            ErrorContext::new(operation)
                .with_entity("todo")
                .with_details("field=title"),
        ));
    }
    Ok(())
}

// ==================== Health & Connection ====================

/// Check if the database connection is healthy.
///
/// This is a simple pass-through to the repository's health check.
pub async fn health_check<R: TodoRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Todo Operations ====================

/// List all todos, newest first.
pub async fn list_todos<R: TodoRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Todo>> {
    let todos = repo.list_todos().await?;
    debug!("Listed {} todos", todos.len());
    Ok(todos)
}

/// Create a todo.
///
/// # Returns
/// * `Ok(Todo)` - The stored todo with its assigned id and creation time
/// * `Err(RepositoryError::ValidationError)` - If the title is blank
pub async fn create_todo<R: TodoRepository + ?Sized>(
    repo: &R,
    new_todo: NewTodo,
) -> RepositoryResult<Todo> {
    validate_title("create_todo", &new_todo.title)?;

    let todo = repo.create_todo(&new_todo).await?;
    info!("Created todo id={}", todo.id);
    Ok(todo)
}

/// Fetch a todo by id.
///
/// # Returns
/// * `Ok(Todo)` - The matching todo
/// * `Err(RepositoryError::NotFound)` - If no todo has this id
pub async fn get_todo<R: TodoRepository + ?Sized>(repo: &R, id: TodoId) -> RepositoryResult<Todo> {
    repo.get_todo(id)
        .await?
        .ok_or_else(|| not_found("get_todo", id))
}

/// Apply a partial update to a todo.
///
/// Only the fields present in `patch` change; `id` and `created_at` are never
/// touched.
///
/// # Returns
/// * `Ok(Todo)` - The todo after the update
/// * `Err(RepositoryError::ValidationError)` - If a title is supplied but blank
/// * `Err(RepositoryError::NotFound)` - If no todo has this id
pub async fn update_todo<R: TodoRepository + ?Sized>(
    repo: &R,
    id: TodoId,
    patch: TodoPatch,
) -> RepositoryResult<Todo> {
    if let Some(ref title) = patch.title {
        validate_title("update_todo", title)?;
    }

    let todo = repo
        .update_todo(id, &patch)
        .await?
        .ok_or_else(|| not_found("update_todo", id))?;
    info!("Updated todo id={}", todo.id);
    Ok(todo)
}

/// Delete a todo.
///
/// # Returns
/// * `Ok(Todo)` - The row that was removed
/// * `Err(RepositoryError::NotFound)` - If no todo has this id
pub async fn delete_todo<R: TodoRepository + ?Sized>(
    repo: &R,
    id: TodoId,
) -> RepositoryResult<Todo> {
    let todo = repo
        .delete_todo(id)
        .await?
        .ok_or_else(|| not_found("delete_todo", id))?;
    info!("Deleted todo id={}", todo.id);
    Ok(todo)
}
