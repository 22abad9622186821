//! # Todo Backend
//!
//! A small REST backend for a single "todo" resource backed by PostgreSQL.
//!
//! ## Architecture
//!
//! - [`api`]: Domain types (`Todo`, `NewTodo`, `TodoPatch`, `TodoId`)
//! - [`db`]: Repository pattern, service layer, and persistence backends
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! The repository is constructed once at startup and injected into the HTTP
//! layer through [`http::AppState`].

pub mod api;

pub mod db;

#[cfg(feature = "http-server")]
pub mod http;
