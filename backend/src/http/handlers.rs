//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer in [`crate::db::services`].

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateTodoRequest, DeleteTodoResponse, HealthResponse, Todo, UpdateTodoRequest};
use super::error::AppError;
use super::state::AppState;
use crate::api::TodoId;
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_todo_id(raw: &str) -> Result<TodoId, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid todo id: {}", raw)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            "error".to_string()
        }
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Todo CRUD
// =============================================================================

/// GET /todos
///
/// List all todos, newest first.
pub async fn list_todos(State(state): State<AppState>) -> HandlerResult<Vec<Todo>> {
    let todos = db_services::list_todos(state.repository.as_ref()).await?;
    Ok(Json(todos))
}

/// POST /todos
///
/// Create a todo. Responds with 201 and the stored row.
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let Json(request) = payload?;
    let new_todo = request
        .into_new_todo()
        .ok_or_else(|| AppError::BadRequest("title is required".to_string()))?;

    let todo = db_services::create_todo(state.repository.as_ref(), new_todo).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /todos/{id}
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Todo> {
    let id = parse_todo_id(&id)?;
    let todo = db_services::get_todo(state.repository.as_ref(), id).await?;
    Ok(Json(todo))
}

/// PUT /todos/{id}
///
/// Partial update: only the fields present in the body change.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> HandlerResult<Todo> {
    let id = parse_todo_id(&id)?;
    let Json(patch) = payload?;

    let todo = db_services::update_todo(state.repository.as_ref(), id, patch).await?;
    Ok(Json(todo))
}

/// DELETE /todos/{id}
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<DeleteTodoResponse> {
    let id = parse_todo_id(&id)?;
    db_services::delete_todo(state.repository.as_ref(), id).await?;
    Ok(Json(DeleteTodoResponse { success: true }))
}
