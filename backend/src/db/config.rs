//! Database configuration and environment variable handling.

use std::env;

use super::repository::{ErrorContext, RepositoryError, RepositoryResult};

/// Configuration for connecting to Postgres.
///
/// Available regardless of enabled features so configuration can be parsed
/// and validated before the backend is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of idle connections kept in the pool
    pub min_pool_size: u32,
    /// Pool checkout timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
    /// - `PG_POOL_MAX`: Maximum pool size (default: 10)
    /// - `PG_POOL_MIN`: Minimum pool size (default: 1)
    /// - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
    /// - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
    ///
    /// Unparseable numeric values fall back to their defaults.
    ///
    /// # Errors
    /// Returns a `ConfigurationError` if no connection string is set or the
    /// pool sizes are inconsistent (see [`PostgresConfig::validate`]).
    pub fn from_env() -> RepositoryResult<Self> {
        let database_url = env::var("DATABASE_URL")
            .or_else(|_| env::var("PG_DATABASE_URL"))
            .map_err(|_| {
                RepositoryError::configuration("DATABASE_URL or PG_DATABASE_URL must be set")
            })?;

        let defaults = Self::default();

        let config = Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the pool settings before they reach r2d2, which panics on a zero
    /// `max_size` or on `min_idle > max_size`.
    pub fn validate(&self) -> RepositoryResult<()> {
        if self.max_pool_size == 0 {
            return Err(RepositoryError::configuration_with_context(
                "max pool size must be at least 1",
                ErrorContext::new("validate_config").with_details("max_pool_size=0"),
            ));
        }
        if self.min_pool_size > self.max_pool_size {
            return Err(RepositoryError::configuration_with_context(
                format!(
                    "min pool size ({}) exceeds max pool size ({})",
                    self.min_pool_size, self.max_pool_size
                ),
                ErrorContext::new("validate_config"),
            ));
        }
        Ok(())
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_url_uses_pool_defaults() {
        let config = PostgresConfig::with_url("postgres://localhost/todos");
        assert_eq!(config.database_url, "postgres://localhost/todos");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.min_pool_size, 1);
        assert_eq!(config.connection_timeout_sec, 30);
        assert_eq!(config.idle_timeout_sec, 600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_max_pool_size() {
        let config = PostgresConfig {
            max_pool_size: 0,
            min_pool_size: 0,
            ..PostgresConfig::with_url("postgres://localhost/todos")
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
        assert!(err.message().contains("at least 1"));
    }

    #[test]
    fn test_validate_rejects_min_above_max() {
        let config = PostgresConfig {
            min_pool_size: 20,
            ..PostgresConfig::with_url("postgres://localhost/todos")
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
        assert_eq!(err.message(), "min pool size (20) exceeds max pool size (10)");
    }

    #[test]
    fn test_validate_accepts_equal_bounds() {
        let config = PostgresConfig {
            max_pool_size: 1,
            min_pool_size: 1,
            ..PostgresConfig::with_url("postgres://localhost/todos")
        };
        assert!(config.validate().is_ok());
    }
}
