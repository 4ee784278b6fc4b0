//! Database lifecycle and access-grant models.
//!
//! Request and response bodies of the driver's RPC surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Key of the single credential entry in a grant response.
pub const CREDENTIAL_KEY: &str = "cred";

pub const SECRET_DB_USER: &str = "DB_USER";
pub const SECRET_DB_PASSWORD: &str = "DB_PASSWORD";
pub const SECRET_DB_HOST: &str = "DB_HOST";
pub const SECRET_DB_PORT: &str = "DB_PORT";
pub const SECRET_DB_NAME: &str = "DB_NAME";

/// Request body for creating a database.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDatabaseRequest {
    /// Logical database name.
    #[validate(length(min = 1, max = 63, message = "Name must be 1-63 characters"))]
    pub name: String,
}

/// Response body for a created database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CreateDatabaseResponse {
    /// Identifier of the created database (equal to its name).
    pub database_id: String,
}

/// Request body for granting access to a database.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GrantAccessRequest {
    /// Name of the principal requesting access.
    #[serde(default)]
    pub account_name: Option<String>,
}

/// Connection secrets for one credential entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CredentialDetails {
    pub secrets: BTreeMap<String, String>,
}

/// Credential bundle returned by an access grant.
///
/// The secrets are the shared administrative credentials scoped to nothing
/// but the database name; they are not per-principal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CredentialBundle {
    /// Account identifier, equal to the database identifier.
    pub account_id: String,
    /// Credential entries keyed by name.
    pub credentials: BTreeMap<String, CredentialDetails>,
}

impl CredentialBundle {
    /// Secrets of the single issued credential entry.
    pub fn secrets(&self) -> Option<&BTreeMap<String, String>> {
        self.credentials.get(CREDENTIAL_KEY).map(|c| &c.secrets)
    }
}

/// Provider identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ProviderInfo {
    /// Provider name.
    pub name: String,
}
