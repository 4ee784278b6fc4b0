//! Database lifecycle manager.
//!
//! A database name is either present in the catalog or absent. `create`
//! is the only absent → present transition and `delete` the only
//! present → absent one; a name may cycle between the two indefinitely.
//!
//! The catalog listing is a fast pre-check only. It is not atomic with the
//! DDL that follows, so the backend's own conflict errors are the real
//! serialization point and are reclassified as `AlreadyExists`/`NotFound`.

use std::sync::Arc;

use common::errors::{AppError, AppResult};
use common::utils::{DdlStatement, IdentifierSanitizer};

use crate::connector::AdminBackend;

/// Creates and drops databases on the administrative backend.
pub struct LifecycleManager {
    backend: Arc<dyn AdminBackend>,
}

impl LifecycleManager {
    pub fn new(backend: Arc<dyn AdminBackend>) -> Self {
        Self { backend }
    }

    /// Creates `name` and returns it as the database identifier.
    pub async fn create_database(&self, name: &str) -> AppResult<String> {
        let ident = IdentifierSanitizer::sanitize(name)?;

        let existing = self.backend.list_databases().await?;
        if existing.contains(ident.as_str()) {
            tracing::info!(database = %ident, "Database already exists");
            return Err(AppError::AlreadyExists(ident.to_string()));
        }

        self.backend
            .execute(&DdlStatement::create_database(&ident))
            .await
            .inspect_err(|e| tracing::warn!(database = %ident, error = %e, "Failed to create database"))?;

        tracing::info!(database = %ident, "Database created");
        Ok(ident.to_string())
    }

    /// Drops `name`.
    pub async fn delete_database(&self, name: &str) -> AppResult<()> {
        let ident = IdentifierSanitizer::sanitize(name)?;

        let existing = self.backend.list_databases().await?;
        if !existing.contains(ident.as_str()) {
            tracing::info!(database = %ident, "Database not found");
            return Err(AppError::NotFound(ident.to_string()));
        }

        self.backend
            .execute(&DdlStatement::drop_database(&ident))
            .await
            .inspect_err(|e| tracing::warn!(database = %ident, error = %e, "Failed to delete database"))?;

        tracing::info!(database = %ident, "Database deleted");
        Ok(())
    }

    /// Lists database names, sorted. Read-only.
    pub async fn list_databases(&self) -> AppResult<Vec<String>> {
        let mut names: Vec<String> = self.backend.list_databases().await?.into_iter().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::testing::InMemoryBackend;

    fn manager(backend: &Arc<InMemoryBackend>) -> LifecycleManager {
        LifecycleManager::new(backend.clone())
    }

    #[tokio::test]
    async fn test_create_then_listed() {
        let backend = Arc::new(InMemoryBackend::with_databases(&["postgres"]));
        let mgr = manager(&backend);

        let id = mgr.create_database("orders").await.unwrap();
        assert_eq!(id, "orders");
        assert!(mgr.list_databases().await.unwrap().contains(&"orders".to_string()));
        assert_eq!(backend.executed(), vec!["CREATE DATABASE \"orders\""]);
    }

    #[tokio::test]
    async fn test_create_twice_already_exists() {
        let backend = Arc::new(InMemoryBackend::default());
        let mgr = manager(&backend);

        mgr.create_database("orders").await.unwrap();
        let err = mgr.create_database("orders").await.unwrap_err();
        assert_eq!(err, AppError::AlreadyExists("orders".into()));
        // The second call never reached the backend DDL.
        assert_eq!(backend.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_never_created_not_found() {
        let backend = Arc::new(InMemoryBackend::default());
        let err = manager(&backend).delete_database("ghost").await.unwrap_err();
        assert_eq!(err, AppError::NotFound("ghost".into()));
        assert!(backend.executed().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let backend = Arc::new(InMemoryBackend::default());
        let mgr = manager(&backend);

        mgr.create_database("t1").await.unwrap();
        assert!(mgr.list_databases().await.unwrap().contains(&"t1".to_string()));
        mgr.delete_database("t1").await.unwrap();
        assert!(!mgr.list_databases().await.unwrap().contains(&"t1".to_string()));

        // A name may cycle back.
        mgr.create_database("t1").await.unwrap();
        assert!(backend.contains("t1"));
    }

    #[tokio::test]
    async fn test_names_compare_exactly() {
        let backend = Arc::new(InMemoryBackend::with_databases(&["Orders"]));
        let mgr = manager(&backend);

        mgr.create_database("orders").await.unwrap();
        assert_eq!(
            mgr.list_databases().await.unwrap(),
            vec!["Orders".to_string(), "orders".to_string()]
        );
    }

    #[tokio::test]
    async fn test_racing_create_reclassified_as_already_exists() {
        let backend = Arc::new(InMemoryBackend {
            stale_listing: true,
            ..InMemoryBackend::with_databases(&["orders"])
        });
        let err = manager(&backend).create_database("orders").await.unwrap_err();
        assert_eq!(err, AppError::AlreadyExists("orders".into()));
    }

    #[tokio::test]
    async fn test_concurrent_creates_one_winner() {
        let backend = Arc::new(InMemoryBackend {
            stale_listing: true,
            ..InMemoryBackend::default()
        });
        let mgr = Arc::new(manager(&backend));

        let (a, b) = tokio::join!(
            {
                let mgr = mgr.clone();
                async move { mgr.create_database("orders").await }
            },
            {
                let mgr = mgr.clone();
                async move { mgr.create_database("orders").await }
            }
        );
        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(AppError::AlreadyExists(_)))));
    }

    #[tokio::test]
    async fn test_injection_attempt_is_quoted() {
        let backend = Arc::new(InMemoryBackend::with_databases(&["x"]));
        let mgr = manager(&backend);
        let name = "a\"; DROP DATABASE x; --";

        let id = mgr.create_database(name).await.unwrap();
        assert_eq!(id, name);
        assert_eq!(
            backend.executed(),
            vec!["CREATE DATABASE \"a\"\"; DROP DATABASE x; --\"".to_string()]
        );
        assert!(backend.contains("x"));
        assert!(backend.contains(name));
    }

    #[tokio::test]
    async fn test_invalid_name_rejected_before_backend() {
        let backend = Arc::new(InMemoryBackend {
            unreachable: true,
            ..InMemoryBackend::default()
        });
        let err = manager(&backend).create_database("").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces_kind() {
        let backend = Arc::new(InMemoryBackend {
            unreachable: true,
            ..InMemoryBackend::default()
        });
        let mgr = manager(&backend);
        assert!(matches!(
            mgr.create_database("t1").await,
            Err(AppError::ConnectionFailure(_))
        ));
        assert!(matches!(
            mgr.delete_database("t1").await,
            Err(AppError::ConnectionFailure(_))
        ));
        assert!(matches!(
            mgr.list_databases().await,
            Err(AppError::ConnectionFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_racing_delete_reclassified_as_not_found() {
        let backend = Arc::new(InMemoryBackend {
            ghost_listing: vec!["t1".into()],
            ..InMemoryBackend::default()
        });
        let err = manager(&backend).delete_database("t1").await.unwrap_err();
        assert_eq!(err, AppError::NotFound("t1".into()));
        // The listing said present, so the DROP was issued and lost the race.
        assert_eq!(backend.executed(), vec!["DROP DATABASE \"t1\""]);
    }

    #[tokio::test]
    async fn test_listing_query_failure_surfaces_kind() {
        let backend = Arc::new(InMemoryBackend {
            listing_fails: true,
            ..InMemoryBackend::with_databases(&["t1"])
        });
        let mgr = manager(&backend);
        assert!(matches!(
            mgr.create_database("t2").await,
            Err(AppError::QueryFailure(_))
        ));
        assert!(matches!(
            mgr.delete_database("t1").await,
            Err(AppError::QueryFailure(_))
        ));
        assert!(matches!(
            mgr.list_databases().await,
            Err(AppError::QueryFailure(_))
        ));
        assert!(backend.executed().is_empty());
        assert!(backend.contains("t1"));
    }
}
