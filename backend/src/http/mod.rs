//! HTTP server module for the todo backend.
//!
//! An axum-based HTTP server that exposes the todo service layer as a REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Path/body extraction and validation                    │
//! │  - JSON serialization/deserialization                     │
//! │  - CORS, compression, error mapping                       │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (db/services.rs)                           │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository / PostgresRepository                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
