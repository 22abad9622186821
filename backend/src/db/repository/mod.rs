//! Repository trait definitions for database operations.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`todo`]: CRUD operations for the `todos` table
//!
//! Handlers and services hold the store as `Arc<dyn TodoRepository>`, so any
//! backend implementing the trait can be swapped in at startup.

pub mod error;
pub mod todo;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use todo::TodoRepository;
