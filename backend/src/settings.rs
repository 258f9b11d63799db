//! Process configuration loaded via OrthoConfig.
//!
//! Three sections are read from the environment, each under its own prefix:
//!
//! - `APP_DB_*`: database connection and pool limits;
//! - `HTTP_*`: listener address, timeouts, and the optional log file;
//! - `USERS_*`: route layout, body size cap, and the missing-record update
//!   policy.
//!
//! Unset values fall back to the defaults exposed by the accessor methods.
//! Values that fail to parse abort loading with a [`SettingsError`].

use std::ffi::OsString;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::MissingRecordPolicy;
use crate::inbound::http::routes::ResourceRoutes;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_DB_USERNAME: &str = "root";
const DEFAULT_DB_NAME: &str = "pavedroad";
const DEFAULT_DB_SSL_MODE: &str = "disable";
const DEFAULT_DB_HOST: &str = "127.0.0.1";
const DEFAULT_DB_PORT: u16 = 26257;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_HTTP_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_HTTP_PORT: u16 = 8082;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 15;

const DEFAULT_API_VERSION: &str = "/api/v1";
const DEFAULT_NAMESPACE_ID: &str = "namespace";
const DEFAULT_RESOURCE_TYPE: &str = "users";

/// Failure to load one configuration section.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load {section} settings: {message}")]
pub struct SettingsError {
    section: &'static str,
    message: String,
}

impl SettingsError {
    fn new(section: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            section,
            message: err.to_string(),
        }
    }

    /// Name of the section that failed.
    #[must_use]
    pub fn section(&self) -> &'static str {
        self.section
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APP_DB")]
pub struct DatabaseSettings {
    /// Full connection string; when set, the individual parts are ignored.
    pub url: Option<String>,
    /// Role name.
    pub username: Option<String>,
    /// Role password.
    pub password: Option<String>,
    /// Database name.
    pub name: Option<String>,
    /// `sslmode` connection parameter.
    pub ssl_mode: Option<String>,
    /// Server host.
    pub ip: Option<String>,
    /// Server port.
    pub port: Option<u16>,
    /// Maximum pooled connections.
    pub pool_size: Option<u32>,
    /// Connection checkout timeout in seconds.
    pub connect_timeout: Option<u64>,
}

/// Quote a libpq keyword/value parameter when it needs it.
fn conninfo_value(raw: &str) -> String {
    let needs_quotes =
        raw.is_empty() || raw.chars().any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if !needs_quotes {
        return raw.to_owned();
    }
    let escaped = raw.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

impl DatabaseSettings {
    /// Role name, defaulting to `root`.
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(DEFAULT_DB_USERNAME)
    }

    /// Database name, defaulting to `pavedroad`.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_DB_NAME)
    }

    /// `sslmode`, defaulting to `disable`.
    pub fn ssl_mode(&self) -> &str {
        self.ssl_mode.as_deref().unwrap_or(DEFAULT_DB_SSL_MODE)
    }

    /// Server host, defaulting to `127.0.0.1`.
    pub fn host(&self) -> &str {
        self.ip.as_deref().unwrap_or(DEFAULT_DB_HOST)
    }

    /// Server port, defaulting to `26257`.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_DB_PORT)
    }

    /// Pool size, defaulting to 10.
    pub fn pool_size(&self) -> u32 {
        self.pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Checkout timeout, defaulting to 30 seconds.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    /// Connection string for the pool.
    ///
    /// Uses `APP_DB_URL` verbatim when set; otherwise assembles a libpq
    /// keyword/value string from the individual settings. An empty password
    /// is omitted.
    pub fn database_url(&self) -> String {
        if let Some(url) = self.url.as_deref().filter(|url| !url.trim().is_empty()) {
            return url.to_owned();
        }
        let mut parts = vec![format!("user={}", conninfo_value(self.username()))];
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            parts.push(format!("password={}", conninfo_value(password)));
        }
        parts.push(format!("dbname={}", conninfo_value(self.name())));
        parts.push(format!("sslmode={}", conninfo_value(self.ssl_mode())));
        parts.push(format!("host={}", conninfo_value(self.host())));
        parts.push(format!("port={}", self.port()));
        parts.join(" ")
    }

    /// Pool configuration derived from these settings.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.database_url())
            .with_max_size(self.pool_size())
            .with_connection_timeout(self.connect_timeout())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HTTP")]
pub struct HttpSettings {
    /// Listen address.
    pub ip_addr: Option<IpAddr>,
    /// Listen port.
    pub ip_port: Option<u16>,
    /// Seconds allowed for a client to send request headers.
    pub read_timeout: Option<u64>,
    /// Seconds allowed for in-flight requests to drain on shutdown.
    pub shutdown_timeout: Option<u64>,
    /// Log file path; logs go to stdout when unset.
    pub log: Option<String>,
}

impl HttpSettings {
    /// Socket address to bind, defaulting to `127.0.0.1:8082`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.ip_addr.unwrap_or(DEFAULT_HTTP_ADDR),
            self.ip_port.unwrap_or(DEFAULT_HTTP_PORT),
        )
    }

    /// Request-head read timeout, defaulting to 60 seconds.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT_SECS))
    }

    /// Graceful shutdown period, defaulting to 15 seconds.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(
            self.shutdown_timeout
                .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        )
    }

    /// Log file, if one is configured.
    pub fn log_path(&self) -> Option<&Path> {
        self.log
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(Path::new)
    }
}

/// Resource layout and behaviour settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERS")]
pub struct ResourceSettings {
    /// Path prefix carrying the API version.
    pub api_version: Option<String>,
    /// Literal segment preceding the namespace.
    pub namespace_id: Option<String>,
    /// Resource name used in paths.
    pub resource_type: Option<String>,
    /// Answer updates of unknown records with 404 instead of 200.
    #[ortho_config(default = false)]
    pub reject_missing_updates: bool,
    /// Largest create/update body in bytes.
    pub max_body_bytes: Option<usize>,
}

impl ResourceSettings {
    /// Route table for the configured layout.
    pub fn routes(&self) -> ResourceRoutes {
        let routes = ResourceRoutes::new(
            self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION),
            self.namespace_id.as_deref().unwrap_or(DEFAULT_NAMESPACE_ID),
            self.resource_type.as_deref().unwrap_or(DEFAULT_RESOURCE_TYPE),
        );
        match self.max_body_bytes {
            Some(limit) => routes.with_body_limit(limit),
            None => routes,
        }
    }

    /// Policy for updates that match no record.
    pub fn missing_record_policy(&self) -> MissingRecordPolicy {
        if self.reject_missing_updates {
            MissingRecordPolicy::Reject
        } else {
            MissingRecordPolicy::Acknowledge
        }
    }
}

/// Complete process configuration, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Database section.
    pub database: DatabaseSettings,
    /// HTTP section.
    pub http: HttpSettings,
    /// Resource section.
    pub resource: ResourceSettings,
}

impl AppConfig {
    /// Load every section from the process environment.
    ///
    /// # Errors
    /// Returns [`SettingsError`] naming the first section that fails.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from_iter([OsString::from("users-backend")])
    }

    /// Load every section, passing `args` to each loader.
    ///
    /// # Errors
    /// Returns [`SettingsError`] naming the first section that fails.
    pub fn load_from_iter<I>(args: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = OsString> + Clone,
    {
        let database = DatabaseSettings::load_from_iter(args.clone())
            .map_err(|err| SettingsError::new("database", err))?;
        let http =
            HttpSettings::load_from_iter(args.clone()).map_err(|err| SettingsError::new("http", err))?;
        let resource = ResourceSettings::load_from_iter(args)
            .map_err(|err| SettingsError::new("resource", err))?;
        Ok(Self {
            database,
            http,
            resource,
        })
    }
}
