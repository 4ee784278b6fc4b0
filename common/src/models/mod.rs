//! Shared data models.

pub mod connection;
pub mod database;

// Re-export commonly used types
pub use connection::ConnectionConfig;
pub use database::{
    CreateDatabaseRequest, CreateDatabaseResponse, CredentialBundle, CredentialDetails,
    GrantAccessRequest, ProviderInfo,
};
