//! Postgres repository implementation using Diesel.
//!
//! Every logical operation maps to exactly one parameterized statement
//! against the `todos` table.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic migration execution
//!
//! Pool settings come from [`PostgresConfig`].

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;
use std::time::Duration;
use tokio::task;

use crate::api::{NewTodo, Todo, TodoId, TodoPatch};
use crate::db::config::PostgresConfig;
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult, TodoRepository};

mod models;
mod schema;

use models::*;
use schema::todos;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if the pool settings are invalid, or if
    ///   connection or migration fails
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        config.validate()?;

        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        if !applied.is_empty() {
            info!("Applied {} pending migration(s)", applied.len());
        }

        Ok(())
    }

    /// Run `f` on a pooled connection inside `spawn_blocking`.
    ///
    /// Failures are returned as-is; nothing is retried.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new(operation).with_details("get_connection"),
                )
            })?;
            f(&mut conn).map_err(|e| e.with_operation(operation))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn select_todo(conn: &mut PgConnection, id: TodoId) -> RepositoryResult<Option<Todo>> {
    todos::table
        .find(id.value())
        .select(TodoRow::as_select())
        .first::<TodoRow>(conn)
        .optional()
        .map(|row| row.map(Todo::from))
        .map_err(map_diesel_error)
}

#[async_trait]
impl TodoRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_todos(&self) -> RepositoryResult<Vec<Todo>> {
        self.with_conn("list_todos", |conn| {
            let rows = todos::table
                .order((todos::created_at.desc(), todos::id.desc()))
                .select(TodoRow::as_select())
                .load::<TodoRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(Todo::from).collect())
        })
        .await
    }

    async fn create_todo(&self, new_todo: &NewTodo) -> RepositoryResult<Todo> {
        let row = NewTodoRow::from(new_todo);
        self.with_conn("create_todo", move |conn| {
            diesel::insert_into(todos::table)
                .values(&row)
                .returning(TodoRow::as_returning())
                .get_result::<TodoRow>(conn)
                .map(Todo::from)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn get_todo(&self, id: TodoId) -> RepositoryResult<Option<Todo>> {
        self.with_conn("get_todo", move |conn| select_todo(conn, id)).await
    }

    async fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> RepositoryResult<Option<Todo>> {
        // Diesel refuses an UPDATE with an empty SET clause.
        if patch.is_empty() {
            return self.get_todo(id).await;
        }

        let changeset = TodoChangeset::from(patch);
        self.with_conn("update_todo", move |conn| {
            diesel::update(todos::table.find(id.value()))
                .set(&changeset)
                .returning(TodoRow::as_returning())
                .get_result::<TodoRow>(conn)
                .optional()
                .map(|row| row.map(Todo::from))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn delete_todo(&self, id: TodoId) -> RepositoryResult<Option<Todo>> {
        self.with_conn("delete_todo", move |conn| {
            diesel::delete(todos::table.find(id.value()))
                .returning(TodoRow::as_returning())
                .get_result::<TodoRow>(conn)
                .optional()
                .map(|row| row.map(Todo::from))
                .map_err(map_diesel_error)
        })
        .await
    }
}
