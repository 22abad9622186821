//! Todo repository trait for CRUD operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{NewTodo, Todo, TodoId, TodoPatch};

/// Repository trait for the `todos` table.
///
/// Id-scoped operations return `Ok(None)` when no row matches; deciding that
/// this is a "not found" condition is left to the caller.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// List every todo, newest first (`created_at DESC, id DESC`).
    async fn list_todos(&self) -> RepositoryResult<Vec<Todo>>;

    /// Insert a todo with `completed = false`.
    ///
    /// # Returns
    /// * `Ok(Todo)` - The stored row, including the assigned id and `created_at`
    async fn create_todo(&self, new_todo: &NewTodo) -> RepositoryResult<Todo>;

    /// Fetch a single todo by id.
    async fn get_todo(&self, id: TodoId) -> RepositoryResult<Option<Todo>>;

    /// Apply the fields present in `patch` and return the updated row.
    ///
    /// Fields absent from the patch keep their stored values. An empty patch
    /// behaves like [`TodoRepository::get_todo`].
    async fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> RepositoryResult<Option<Todo>>;

    /// Delete a todo and return the row that was removed.
    async fn delete_todo(&self, id: TodoId) -> RepositoryResult<Option<Todo>>;
}
