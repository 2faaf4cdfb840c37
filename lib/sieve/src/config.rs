//! Settings for [`crate::HyperTransport`].
//!
//! Connection and pool settings are applied once, when the transport is
//! built. `timeout` is applied on every request.

use std::time::Duration;

/// Connection, pool, and deadline settings for [`crate::HyperTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Deadline for a whole exchange, 30s by default.
    ///
    /// The clock starts when the request is sent. It covers connecting,
    /// waiting for the response head, and reading the body, so a server
    /// that stalls mid-body fails with [`crate::Error::Timeout`] instead of
    /// hanging. This includes the error body that
    /// [`crate::ResponseExecutor::execute`] reads to build its message; in
    /// that case the status is still classified, with the reason phrase as
    /// the message.
    ///
    /// Reading a successful body after the deadline also fails, so callers
    /// streaming large downloads should raise it accordingly.
    pub timeout: Duration,
    /// Limit for establishing the TCP connection, 10s by default.
    ///
    /// It does not cover the TLS handshake; that falls under `timeout`.
    pub connect_timeout: Duration,
    /// Idle pooled connections kept per host, 32 by default.
    pub pool_idle_per_host: usize,
    /// How long an idle pooled connection is kept, 90s by default.
    pub pool_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl TransportConfig {
    /// Start from the defaults and override selected settings.
    #[must_use]
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`TransportConfig`], seeded with its defaults.
#[derive(Debug, Clone)]
pub struct TransportConfigBuilder {
    config: TransportConfig,
}

impl TransportConfigBuilder {
    /// See [`TransportConfig::timeout`].
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// See [`TransportConfig::connect_timeout`].
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// See [`TransportConfig::pool_idle_per_host`].
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config.pool_idle_per_host = count;
        self
    }

    /// See [`TransportConfig::pool_idle_timeout`].
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> TransportConfig {
        self.config
    }
}
