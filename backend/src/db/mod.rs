//! Database module for todo storage.
//!
//! This module provides abstractions for database operations via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API)                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Input validation                                     │
//! │  - Missing rows -> NotFound                             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────────┐  ┌──────────▼──────────────┐
//! │ Postgres Repository  │  │ Local Repository        │
//! │ (Diesel + r2d2)      │  │ (in-memory)             │
//! └──────────────────────┘  └─────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use todo_backend::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     let todos = services::list_todos(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```
//!
//! There is no process-wide repository: build one at startup and pass it on.

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use config::PostgresConfig;

// ==================== Service Layer ====================

pub use services::{create_todo, delete_todo, get_todo, health_check, list_todos, update_todo};

// ==================== Repository Pattern Exports ====================

pub use repo_config::RepositoryConfig;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{ErrorContext, RepositoryError, RepositoryResult, TodoRepository};
