//! Error types for repository operations.
//!
//! Every store failure carries an [`ErrorContext`] so logs show which
//! operation and which todo were involved.

use std::fmt;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context for repository errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "create_todo", "delete_todo")
    pub operation: Option<String>,
    /// The entity type involved (always "todo" today)
    pub entity: Option<String>,
    /// The entity ID if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the entity type.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the entity ID.
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Connection pool or database connection errors.
    #[error("Connection error: {message} {context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// SQL query execution errors.
    #[error("Query error: {message} {context}")]
    QueryError {
        message: String,
        context: ErrorContext,
    },

    /// Requested todo was not found.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Input rejected before it reached the store.
    #[error("Data validation error: {message} {context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a connection error with context.
    pub fn connection_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context,
        }
    }

    /// Create a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a not found error with context.
    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a validation error with context.
    pub fn validation_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ValidationError {
            message: message.into(),
            context,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a configuration error with context.
    pub fn configuration_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an internal error with context.
    pub fn internal_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InternalError {
            message: message.into(),
            context,
        }
    }

    /// The bare message, without the context suffix.
    pub fn message(&self) -> &str {
        match self {
            Self::ConnectionError { message, .. }
            | Self::QueryError { message, .. }
            | Self::NotFound { message, .. }
            | Self::ValidationError { message, .. }
            | Self::ConfigurationError { message, .. }
            | Self::InternalError { message, .. } => message,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }

    /// True for failures of the store itself rather than of the request.
    pub fn is_storage_error(&self) -> bool {
        !matches!(self, Self::NotFound { .. } | Self::ValidationError { .. })
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => RepositoryError::not_found("Record not found"),
            diesel::result::Error::DatabaseError(kind, info) => RepositoryError::QueryError {
                message: info.message().to_string(),
                context: ErrorContext::default().with_details(format!("db_error_kind={:?}", kind)),
            },
            diesel::result::Error::QueryBuilderError(e) => {
                RepositoryError::query(format!("Query builder error: {}", e))
            }
            diesel::result::Error::DeserializationError(e) => {
                RepositoryError::internal(format!("Deserialization error: {}", e))
            }
            diesel::result::Error::SerializationError(e) => {
                RepositoryError::internal(format!("Serialization error: {}", e))
            }
            other => RepositoryError::query(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::connection_with_context(
            err.to_string(),
            ErrorContext::default().with_details("pool_error"),
        )
    }
}
