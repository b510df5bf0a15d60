//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the failover pool.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::load_balancer::server::Server;

/// Default host used when no server list is given.
pub const DEFAULT_HOST: &str = "localhost";

/// Default port used when no server list is given.
pub const DEFAULT_PORT: u16 = 9090;

/// Root configuration for the failover pool.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FailoverConfig {
    /// Candidate servers, in selection order. Overrides `host`/`port` when non-empty.
    pub servers: Vec<ServerConfig>,

    /// Single host to connect to when `servers` is empty.
    pub host: String,

    /// Single port to connect to when `servers` is empty.
    pub port: u16,

    /// Seconds between recovery cycles for dead servers.
    pub recovery_delay_secs: u64,

    /// Probe every server as soon as the pool is built.
    pub autoconnect: bool,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Session pool sizing.
    pub pool: SessionPoolConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            recovery_delay_secs: 60,
            autoconnect: true,
            timeouts: TimeoutConfig::default(),
            pool: SessionPoolConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl FailoverConfig {
    /// Build a config for the given `(host, port)` pairs, everything else defaulted.
    pub fn with_servers<I, H>(servers: I) -> Self
    where
        I: IntoIterator<Item = (H, u16)>,
        H: Into<String>,
    {
        Self {
            servers: servers
                .into_iter()
                .map(|(host, port)| ServerConfig { host: host.into(), port })
                .collect(),
            ..Self::default()
        }
    }

    /// The effective server set: `servers` if given, else the single `host:port`.
    pub fn resolved_servers(&self) -> Vec<Server> {
        if self.servers.is_empty() {
            return vec![Server::new(self.host.clone(), self.port)];
        }
        self.servers.iter().map(Server::from).collect()
    }

    pub fn recovery_delay(&self) -> Duration {
        Duration::from_secs(self.recovery_delay_secs)
    }
}

/// A single candidate server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host name or IP address.
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Timeout configuration for network operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment (and recovery probe) timeout in milliseconds.
    pub connect_ms: u64,

    /// Per-attempt operation timeout in milliseconds.
    pub operation_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: 5_000,
            operation_ms: 30_000,
        }
    }
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn operation(&self) -> Duration {
        Duration::from_millis(self.operation_ms)
    }
}

/// Session pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionPoolConfig {
    /// Maximum number of sessions checked out at once.
    pub size: usize,

    /// How long `checkout` waits for a free session. `None` waits forever.
    pub acquire_timeout_ms: Option<u64>,
}

impl Default for SessionPoolConfig {
    fn default() -> Self {
        Self {
            size: 10,
            acquire_timeout_ms: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Install a Prometheus exporter.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}
