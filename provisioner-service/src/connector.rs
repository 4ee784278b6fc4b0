//! Administrative backend access.
//!
//! Every call opens its own short-lived administrative connection and closes
//! it before returning, whatever the outcome. There is no pool and no cached
//! catalog state.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use common::errors::{AppError, AppResult};
use common::models::ConnectionConfig;
use common::utils::DdlStatement;
use sqlx::{Connection, Executor, PgConnection};

use crate::classifier;

/// Catalog query listing every database, templates included.
pub const LIST_DATABASES_SQL: &str = "SELECT datname FROM pg_database";

/// Administrative operations the lifecycle manager needs from a backend.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// Lists the names of all databases in the catalog.
    async fn list_databases(&self) -> AppResult<HashSet<String>>;

    /// Runs one lifecycle DDL statement, classifying any failure.
    async fn execute(&self, statement: &DdlStatement) -> AppResult<()>;
}

/// Postgres administrative connector.
pub struct PgAdminConnector {
    config: Arc<ConnectionConfig>,
}

impl PgAdminConnector {
    pub fn new(config: Arc<ConnectionConfig>) -> Self {
        Self { config }
    }

    async fn connect(&self) -> AppResult<PgConnection> {
        let options = self.config.connect_options();
        let timeout = self.config.connect_timeout;

        match tokio::time::timeout(timeout, PgConnection::connect_with(&options)).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => {
                tracing::warn!(host = %self.config.host, port = self.config.port, error = %e, "Administrative connection failed");
                Err(classifier::connection_failure(e))
            }
            Err(_) => {
                tracing::warn!(host = %self.config.host, port = self.config.port, ?timeout, "Administrative connection timed out");
                Err(AppError::ConnectionFailure(format!(
                    "Can't connect: timed out after {:?}",
                    timeout
                )))
            }
        }
    }

    async fn release(conn: PgConnection) {
        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "Failed to close DB connection");
        }
    }
}

#[async_trait]
impl AdminBackend for PgAdminConnector {
    async fn list_databases(&self) -> AppResult<HashSet<String>> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_scalar::<_, String>(LIST_DATABASES_SQL)
            .fetch_all(&mut conn)
            .await;
        Self::release(conn).await;

        let names = result.map_err(classifier::query_failure)?;
        tracing::debug!(count = names.len(), "Listed databases");
        Ok(names.into_iter().collect())
    }

    async fn execute(&self, statement: &DdlStatement) -> AppResult<()> {
        let mut conn = self.connect().await?;
        // Identifiers cannot be bound, so this goes out as a single
        // unparameterized statement built by the sanitizer.
        let result = conn.execute(statement.as_sql()).await;
        Self::release(conn).await;

        result
            .map(|_| ())
            .map_err(|e| classifier::classify_ddl_error(statement, &e))
    }
}
