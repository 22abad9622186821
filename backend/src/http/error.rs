//! HTTP error handling and response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::db::repository::RepositoryError;

/// Message sent for every 5xx response. Store errors are logged, not returned.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Repository(RepositoryError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Repository(RepositoryError::ValidationError { .. }) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg),
            AppError::Internal(msg) => {
                error!(error = %msg, "request failed");
                ApiError::new("INTERNAL_ERROR", INTERNAL_ERROR_MESSAGE)
            }
            AppError::Repository(e) => match e {
                RepositoryError::NotFound { message, .. } => ApiError::new("NOT_FOUND", message),
                RepositoryError::ValidationError { message, .. } => {
                    ApiError::new("BAD_REQUEST", message)
                }
                other => {
                    error!(error = %other, "repository operation failed");
                    ApiError::new("INTERNAL_ERROR", INTERNAL_ERROR_MESSAGE)
                }
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::ErrorContext;

    #[test]
    fn test_repository_errors_map_to_status() {
        let not_found = AppError::from(RepositoryError::not_found("Todo not found"));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let invalid = AppError::from(RepositoryError::validation("title must not be empty"));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let broken = AppError::from(RepositoryError::connection_with_context(
            "connection refused",
            ErrorContext::new("list_todos"),
        ));
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_query_error_is_reported_as_500() {
        let response = AppError::from(RepositoryError::query("relation \"todos\" does not exist"))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_anyhow_error_is_internal() {
        let err = AppError::from(anyhow::anyhow!("pool exhausted"));
        assert!(matches!(err, AppError::Internal(ref msg) if msg == "pool exhausted"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
