//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use users_backend::domain::MissingRecordPolicy;
use users_backend::inbound::http::routes::ResourceRoutes;
use users_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) routes: ResourceRoutes,
    pub(crate) missing_policy: MissingRecordPolicy,
    pub(crate) read_timeout: Duration,
    pub(crate) shutdown_timeout: Duration,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Configuration with default timeouts and the default missing-record policy.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, routes: ResourceRoutes) -> Self {
        Self {
            bind_addr,
            db_pool,
            routes,
            missing_policy: MissingRecordPolicy::default(),
            read_timeout: Duration::from_secs(60),
            shutdown_timeout: Duration::from_secs(15),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Choose how updates of unknown records are answered.
    #[must_use]
    pub fn with_missing_policy(mut self, policy: MissingRecordPolicy) -> Self {
        self.missing_policy = policy;
        self
    }

    /// Set the request-head read timeout and the graceful shutdown period.
    #[must_use]
    pub fn with_timeouts(mut self, read: Duration, shutdown: Duration) -> Self {
        self.read_timeout = read;
        self.shutdown_timeout = shutdown;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
