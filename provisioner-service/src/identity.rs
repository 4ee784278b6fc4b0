//! Provider identity.

use common::errors::{AppError, AppResult};
use common::models::ProviderInfo;

/// Reports the configured provider name.
pub struct IdentityInfo {
    provisioner_name: String,
}

impl IdentityInfo {
    pub fn new(provisioner_name: impl Into<String>) -> Self {
        Self {
            provisioner_name: provisioner_name.into(),
        }
    }

    pub fn get_info(&self) -> AppResult<ProviderInfo> {
        if self.provisioner_name.is_empty() {
            tracing::error!("provisioner name cannot be empty");
            return Err(AppError::InvalidArgument("ProvisionerName is empty".into()));
        }
        Ok(ProviderInfo {
            name: self.provisioner_name.clone(),
        })
    }
}
