//! Access grants.
//!
//! The issued credentials are the shared administrative identity, scoped
//! only by database name. Nothing per-principal is created, so there is
//! nothing to revoke: `revoke_access` is a no-op.

use std::collections::BTreeMap;
use std::sync::Arc;

use common::errors::{AppError, AppResult};
use common::models::database::{
    CREDENTIAL_KEY, SECRET_DB_HOST, SECRET_DB_NAME, SECRET_DB_PASSWORD, SECRET_DB_PORT,
    SECRET_DB_USER,
};
use common::models::{ConnectionConfig, CredentialBundle, CredentialDetails};

/// Builds credential bundles from the static connection configuration.
pub struct CredentialIssuer {
    config: Arc<ConnectionConfig>,
}

impl CredentialIssuer {
    pub fn new(config: Arc<ConnectionConfig>) -> Self {
        Self { config }
    }

    /// Packages the administrative credentials for `database_id`.
    ///
    /// Does not contact the backend and does not check that the database
    /// exists.
    pub fn grant_access(&self, database_id: &str) -> AppResult<CredentialBundle> {
        if database_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "database id must not be empty".into(),
            ));
        }

        let secrets = BTreeMap::from([
            (SECRET_DB_USER.to_string(), self.config.user.clone()),
            (SECRET_DB_PASSWORD.to_string(), self.config.password.clone()),
            (SECRET_DB_HOST.to_string(), self.config.host.clone()),
            (SECRET_DB_PORT.to_string(), self.config.port.to_string()),
            (SECRET_DB_NAME.to_string(), database_id.to_string()),
        ]);

        Ok(CredentialBundle {
            account_id: database_id.to_string(),
            credentials: BTreeMap::from([(
                CREDENTIAL_KEY.to_string(),
                CredentialDetails { secrets },
            )]),
        })
    }

    /// Always succeeds and does nothing; see the module docs.
    pub fn revoke_access(&self, database_id: &str, account_id: &str) {
        tracing::debug!(database = %database_id, account = %account_id, "Revoke is a no-op for shared credentials");
    }
}
