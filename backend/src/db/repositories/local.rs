//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. Rows live in a `BTreeMap`
//! keyed by id, so behaviour is fast, deterministic, and isolated per
//! instance.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{NewTodo, Todo, TodoId, TodoPatch};
use crate::db::repository::*;

/// In-memory local repository.
///
/// Mirrors the Postgres table semantics: ids start at 1 and only grow (deleted
/// ids are never reused), `created_at` is stamped on insert, and listing is
/// newest first.
///
/// # Example
/// ```
/// use todo_backend::api::NewTodo;
/// use todo_backend::db::repositories::LocalRepository;
/// use todo_backend::db::repository::TodoRepository;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let repo = LocalRepository::new();
/// repo.create_todo(&NewTodo::new("Buy milk")).await.unwrap();
///
/// let todos = repo.list_todos().await.unwrap();
/// assert_eq!(todos.len(), 1);
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    todos: BTreeMap<TodoId, Todo>,
    next_id: i64,
    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            todos: BTreeMap::new(),
            next_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy, every data operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository. Id assignment restarts at 1.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of todos stored.
    pub fn todo_count(&self) -> usize {
        self.data.read().todos.len()
    }

    /// Check if a todo exists.
    pub fn has_todo(&self, id: TodoId) -> bool {
        self.data.read().todos.contains_key(&id)
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation).with_entity("todo"),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_todos(&self) -> RepositoryResult<Vec<Todo>> {
        self.check_health("list_todos")?;
        let data = self.data.read();
        let mut todos: Vec<Todo> = data.todos.values().cloned().collect();
        todos.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(todos)
    }

    async fn create_todo(&self, new_todo: &NewTodo) -> RepositoryResult<Todo> {
        self.check_health("create_todo")?;
        let mut data = self.data.write();
        let id = TodoId(data.next_id);
        data.next_id += 1;

        let todo = Todo {
            id,
            title: new_todo.title.clone(),
            description: new_todo.description.clone(),
            completed: false,
            created_at: Utc::now(),
        };
        data.todos.insert(id, todo.clone());
        Ok(todo)
    }

    async fn get_todo(&self, id: TodoId) -> RepositoryResult<Option<Todo>> {
        self.check_health("get_todo")?;
        Ok(self.data.read().todos.get(&id).cloned())
    }

    async fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> RepositoryResult<Option<Todo>> {
        self.check_health("update_todo")?;
        let mut data = self.data.write();
        Ok(data.todos.get_mut(&id).map(|todo| {
            patch.apply_to(todo);
            todo.clone()
        }))
    }

    async fn delete_todo(&self, id: TodoId) -> RepositoryResult<Option<Todo>> {
        self.check_health("delete_todo")?;
        Ok(self.data.write().todos.remove(&id))
    }
}
