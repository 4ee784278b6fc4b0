//! Process configuration.
//!
//! Loaded once at startup from the environment (optionally seeded from a
//! `.env` file) and shared read-only afterwards.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgSslMode;
use thiserror::Error;

use crate::models::connection::ConnectionConfig;

/// Default listen address, a unix socket owned by the orchestrator.
pub const DEFAULT_DRIVER_ADDR: &str = "unix:///var/lib/database/database.sock";
/// Default provider name reported by `GetInfo`.
pub const DEFAULT_PROVISIONER_NAME: &str = "fake.database.plural.sh";

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_SSL_MODE: &str = "require";
const DEFAULT_MAINTENANCE_DB: &str = "postgres";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid DRIVER_ADDR `{0}`: expected unix://<path>, tcp://<host:port> or <host:port>")]
    InvalidListenAddr(String),

    #[error("invalid DB_SSL_MODE `{0}`")]
    InvalidSslMode(String),
}

/// Where the driver accepts RPC traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenAddr {
    /// Unix domain socket path.
    Unix(PathBuf),
    /// TCP `host:port`.
    Tcp(String),
}

impl FromStr for ListenAddr {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(path) = s.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(ConfigError::InvalidListenAddr(s.to_string()));
            }
            return Ok(ListenAddr::Unix(PathBuf::from(path)));
        }
        let addr = s.strip_prefix("tcp://").unwrap_or(s);
        match addr.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
                Ok(ListenAddr::Tcp(addr.to_string()))
            }
            _ => Err(ConfigError::InvalidListenAddr(s.to_string())),
        }
    }
}

impl std::fmt::Display for ListenAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenAddr::Unix(path) => write!(f, "unix://{}", path.display()),
            ListenAddr::Tcp(addr) => write!(f, "tcp://{}", addr),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Service name used in logs and response metadata.
    pub service_name: String,
    /// RPC listen address.
    pub listen_addr: ListenAddr,
    /// Provider name reported by `GetInfo`. May be empty; `GetInfo` rejects it then.
    pub provisioner_name: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Administrative backend connection.
    pub database: ConnectionConfig,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn load_with_service(service_name: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let listen_addr = get("DRIVER_ADDR", DEFAULT_DRIVER_ADDR).parse()?;

        let ssl_raw = get("DB_SSL_MODE", DEFAULT_SSL_MODE);
        let ssl_mode = ssl_raw
            .parse::<PgSslMode>()
            .map_err(|_| ConfigError::InvalidSslMode(ssl_raw.clone()))?;

        let port = lookup("DB_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DB_PORT);
        let connect_timeout_secs = lookup("DB_CONNECT_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            service_name: service_name.to_string(),
            listen_addr,
            provisioner_name: get("PROVISIONER_NAME", DEFAULT_PROVISIONER_NAME),
            log_format,
            database: ConnectionConfig {
                host: get("DB_HOST", DEFAULT_DB_HOST),
                port,
                user: get("DB_USER", DEFAULT_DB_USER),
                password: get("DB_PASSWORD", ""),
                ssl_mode,
                maintenance_database: get("DB_MAINTENANCE_DB", DEFAULT_MAINTENANCE_DB),
                connect_timeout: Duration::from_secs(connect_timeout_secs),
            },
        })
    }
}

/// Seeds the environment from a `.env` file, if one is found (best-effort).
///
/// Variables already set in the process environment win.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Seeds the environment from the `.env`-style file at `path`.
///
/// Same precedence as [`load_dotenv`]: existing variables are never overwritten.
pub fn load_dotenv_from(path: &Path) -> Result<(), dotenvy::Error> {
    dotenvy::from_path(path)
}
