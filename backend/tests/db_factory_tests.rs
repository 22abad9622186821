//! Tests for db::factory module - repository creation and configuration.

mod support;

use std::io::Write;
use std::str::FromStr;

use todo_backend::api::NewTodo;
use todo_backend::db::config::PostgresConfig;
use todo_backend::db::factory::{RepositoryFactory, RepositoryType};
use todo_backend::db::repository::{RepositoryError, TodoRepository};

#[test]
fn test_repository_type_from_str() {
    assert_eq!(
        RepositoryType::from_str("POSTGRES").unwrap(),
        RepositoryType::Postgres
    );
    assert_eq!(RepositoryType::from_str("pg").unwrap(), RepositoryType::Postgres);
    assert_eq!(RepositoryType::from_str("LOCAL").unwrap(), RepositoryType::Local);

    let result = RepositoryType::from_str("sqlite");
    assert!(result.unwrap_err().contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        || {
            assert_eq!(RepositoryType::from_env().unwrap(), RepositoryType::Local);
        },
    );
}

#[test]
fn test_repository_type_from_env_with_database_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", Some("postgres://localhost/todos")),
        ],
        || {
            assert_eq!(RepositoryType::from_env().unwrap(), RepositoryType::Postgres);
        },
    );
}

#[test]
fn test_repository_type_override_wins_over_database_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("DATABASE_URL", Some("postgres://localhost/todos")),
        ],
        || {
            assert_eq!(RepositoryType::from_env().unwrap(), RepositoryType::Local);
        },
    );
}

#[test]
fn test_unknown_repository_type_is_rejected() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("postgress")),
            ("DATABASE_URL", Some("postgres://localhost/todos")),
        ],
        || {
            let err = RepositoryType::from_env().unwrap_err();
            assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
            assert!(err.message().contains("postgress"));
        },
    );
}

#[test]
fn test_factory_from_env_does_not_fall_back_to_local() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("postgress")),
            ("DATABASE_URL", Some("postgres://localhost/todos")),
        ],
        || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let result = runtime.block_on(RepositoryFactory::from_env());
            assert!(matches!(
                result,
                Err(RepositoryError::ConfigurationError { .. })
            ));
        },
    );
}

#[test]
fn test_postgres_config_from_env() {
    support::with_scoped_env(
        &[
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", Some("postgres://pg/todos")),
            ("PG_POOL_MAX", Some("4")),
            ("PG_POOL_MIN", Some("not-a-number")),
            ("PG_CONN_TIMEOUT_SEC", None),
            ("PG_IDLE_TIMEOUT_SEC", Some("60")),
        ],
        || {
            let config = PostgresConfig::from_env().unwrap();
            assert_eq!(config.database_url, "postgres://pg/todos");
            assert_eq!(config.max_pool_size, 4);
            assert_eq!(config.min_pool_size, 1);
            assert_eq!(config.connection_timeout_sec, 30);
            assert_eq!(config.idle_timeout_sec, 60);
        },
    );
}

#[test]
fn test_postgres_config_requires_url() {
    support::with_scoped_env(&[("DATABASE_URL", None), ("PG_DATABASE_URL", None)], || {
        let err = PostgresConfig::from_env().unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
        assert!(err.message().contains("DATABASE_URL"));
    });
}

#[test]
fn test_postgres_config_from_env_rejects_bad_pool_sizes() {
    for (max, min) in [("0", "0"), ("10", "20")] {
        support::with_scoped_env(
            &[
                ("DATABASE_URL", Some("postgres://localhost/todos")),
                ("PG_POOL_MAX", Some(max)),
                ("PG_POOL_MIN", Some(min)),
            ],
            || {
                let err = PostgresConfig::from_env().unwrap_err();
                assert!(
                    matches!(err, RepositoryError::ConfigurationError { .. }),
                    "max={} min={}",
                    max,
                    min
                );
            },
        );
    }
}

#[tokio::test]
async fn test_create_local_is_usable() {
    let repo = RepositoryFactory::create(RepositoryType::Local, None)
        .await
        .unwrap();

    let todo = repo.create_todo(&NewTodo::new("from factory")).await.unwrap();
    assert_eq!(repo.get_todo(todo.id).await.unwrap(), Some(todo));
}

#[tokio::test]
async fn test_each_local_repository_is_isolated() {
    let first = RepositoryFactory::create_local();
    let second = RepositoryFactory::create_local();

    first.create_todo(&NewTodo::new("only here")).await.unwrap();
    assert_eq!(first.list_todos().await.unwrap().len(), 1);
    assert!(second.list_todos().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_from_config_file_local() {
    let path = std::env::temp_dir().join(format!(
        "todo-backend-repository-{}.toml",
        std::process::id()
    ));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[repository]\ntype = \"local\"").unwrap();
    }

    let repo = RepositoryFactory::from_config_file(&path).await.unwrap();
    assert!(repo.health_check().await.unwrap());

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_from_config_file_missing() {
    let result = RepositoryFactory::from_config_file("/nonexistent/repository.toml").await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

#[cfg(not(feature = "postgres-repo"))]
#[tokio::test]
async fn test_postgres_without_feature_is_configuration_error() {
    let config = PostgresConfig::with_url("postgres://localhost/todos");
    let result = RepositoryFactory::create(RepositoryType::Postgres, Some(&config)).await;

    let err = result.err().unwrap();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    assert!(err.to_string().contains("not enabled"));
    assert!(err.message().contains("--features postgres-repo"));
}

#[cfg(feature = "postgres-repo")]
#[tokio::test]
async fn test_postgres_without_config_is_configuration_error() {
    let result = RepositoryFactory::create(RepositoryType::Postgres, None).await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}
