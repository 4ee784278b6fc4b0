//! Application state for the provisioner service.

use std::sync::Arc;

use common::config::AppConfig;

use crate::connector::{AdminBackend, PgAdminConnector};
use crate::credentials::CredentialIssuer;
use crate::identity::IdentityInfo;
use crate::lifecycle::LifecycleManager;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub lifecycle: Arc<LifecycleManager>,
    pub credentials: Arc<CredentialIssuer>,
    pub identity: Arc<IdentityInfo>,
}

impl AppState {
    /// Creates the application state backed by the configured Postgres server.
    pub fn new(config: AppConfig) -> Self {
        let connection = Arc::new(config.database.clone());
        Self::with_backend(config, Arc::new(PgAdminConnector::new(connection)))
    }

    /// Creates the application state on top of an arbitrary administrative backend.
    pub fn with_backend(config: AppConfig, backend: Arc<dyn AdminBackend>) -> Self {
        let connection = Arc::new(config.database.clone());
        Self {
            lifecycle: Arc::new(LifecycleManager::new(backend)),
            credentials: Arc::new(CredentialIssuer::new(connection)),
            identity: Arc::new(IdentityInfo::new(config.provisioner_name.clone())),
            config: Arc::new(config),
        }
    }
}
