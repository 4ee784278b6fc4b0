//! Administrative connection configuration.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Static administrative connection settings.
///
/// Built once at startup and shared read-only by the lifecycle manager and
/// the credential issuer.
#[derive(Clone)]
pub struct ConnectionConfig {
    /// Backend host.
    pub host: String,
    /// Backend port.
    pub port: u16,
    /// Administrative user.
    pub user: String,
    /// Administrative password.
    pub password: String,
    /// TLS negotiation mode.
    pub ssl_mode: PgSslMode,
    /// Database the administrative session connects to.
    pub maintenance_database: String,
    /// Upper bound on connection establishment.
    pub connect_timeout: Duration,
}

impl ConnectionConfig {
    /// Connect options for an administrative session.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.maintenance_database)
            .ssl_mode(self.ssl_mode)
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("ssl_mode", &self.ssl_mode)
            .field("maintenance_database", &self.maintenance_database)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ConnectionConfig {
        ConnectionConfig {
            host: "db.internal".into(),
            port: 6543,
            user: "admin".into(),
            password: "hunter2".into(),
            ssl_mode: PgSslMode::Require,
            maintenance_database: "postgres".into(),
            connect_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("db.internal"));
    }

    #[test]
    fn test_connect_options_target_maintenance_database() {
        let options = config().connect_options();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "admin");
        assert_eq!(options.get_database(), Some("postgres"));
    }
}
