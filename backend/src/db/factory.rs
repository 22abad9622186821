//! Repository factory for dependency injection.
//!
//! The server builds exactly one repository at startup through this factory
//! and hands it to the HTTP layer inside `AppState`.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{ErrorContext, RepositoryError, RepositoryResult, TodoRepository};
use super::PostgresConfig;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Postgres + Diesel implementation
    Postgres,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("postgres", "pg", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE` environment variable. Defaults to Postgres if a
    /// database URL is present, otherwise Local.
    ///
    /// # Errors
    /// An unrecognised `REPOSITORY_TYPE` is a `ConfigurationError`, never a
    /// silent fallback to the in-memory store.
    pub fn from_env() -> RepositoryResult<Self> {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().map_err(|e: String| {
                RepositoryError::configuration_with_context(
                    e,
                    ErrorContext::new("select_repository").with_details("REPOSITORY_TYPE"),
                )
            });
        }

        if std::env::var("DATABASE_URL").is_ok() || std::env::var("PG_DATABASE_URL").is_ok() {
            Ok(Self::Postgres)
        } else {
            Ok(Self::Local)
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use todo_backend::db::{PostgresConfig, RepositoryFactory, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = PostgresConfig::from_env()?;
///     let _pg_repo = RepositoryFactory::create(RepositoryType::Postgres, Some(&config)).await?;
///
///     let _local_repo = RepositoryFactory::create_local();
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `postgres_config` - Optional database configuration (required for Postgres)
    pub async fn create(
        repo_type: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn TodoRepository>> {
        match repo_type {
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config = postgres_config.ok_or_else(|| {
                        RepositoryError::configuration(
                            "Postgres repository requires PostgresConfig",
                        )
                    })?;
                    let pg = Self::create_postgres(config).await?;
                    Ok(pg as Arc<dyn TodoRepository>)
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    let _ = postgres_config;
                    Err(postgres_disabled())
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a Postgres repository. Pending migrations run before this returns.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let config = config.clone();
        // Pool construction and migrations block on network I/O.
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(format!("Task join error: {}", e)))??;
        Ok(Arc::new(repo))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn TodoRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` to decide; defaults to Postgres if a database
    /// URL is set, otherwise Local. Fails on an unknown type or invalid pool
    /// settings.
    pub async fn from_env() -> RepositoryResult<Arc<dyn TodoRepository>> {
        match RepositoryType::from_env()? {
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config = PostgresConfig::from_env()?;
                    let pg = Self::create_postgres(&config).await?;
                    Ok(pg as Arc<dyn TodoRepository>)
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    Err(postgres_disabled())
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn TodoRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config).await
    }

    async fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn TodoRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        let pg_config = config.to_postgres_config()?;
        Self::create(repo_type, pg_config.as_ref()).await
    }
}

#[cfg(not(feature = "postgres-repo"))]
fn postgres_disabled() -> RepositoryError {
    RepositoryError::configuration(
        "Postgres repository feature not enabled; rebuild with `--features postgres-repo`",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_from_str() {
        assert_eq!(
            RepositoryType::from_str("local").unwrap(),
            RepositoryType::Local
        );
        assert_eq!(
            RepositoryType::from_str("postgres").unwrap(),
            RepositoryType::Postgres
        );
        assert_eq!(
            RepositoryType::from_str("Pg").unwrap(),
            RepositoryType::Postgres
        );
        assert!(RepositoryType::from_str("invalid").is_err());
    }

    #[tokio::test]
    async fn test_create_local_repository() {
        let repo = RepositoryFactory::create_local();
        assert!(repo.health_check().await.unwrap());
    }

    #[cfg(not(feature = "postgres-repo"))]
    #[tokio::test]
    async fn test_postgres_requires_feature() {
        let result = RepositoryFactory::create(RepositoryType::Postgres, None).await;
        let err = result.err().unwrap();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
        assert!(err.message().contains("--features postgres-repo"));
    }
}
