//! Server registry.
//!
//! # Responsibilities
//! - Hold the fixed, ordered set of configured servers
//! - Own per-server health and failure/probe timestamps
//! - Serialize every read and write through a single lock
//!
//! Snapshots are returned by value so callers never iterate while holding
//! the lock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::health::state::ServerHealth;
use crate::load_balancer::server::Server;
use crate::observability::metrics;

#[derive(Debug)]
struct ServerEntry {
    server: Server,
    health: ServerHealth,
    last_failure: Option<Instant>,
    last_probe: Option<Instant>,
}

/// Point-in-time view of one server, for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ServerStatus {
    pub address: String,
    pub health: ServerHealth,
    pub since_last_failure: Option<Duration>,
    pub since_last_probe: Option<Duration>,
}

/// Single source of truth for server health.
#[derive(Debug)]
pub struct ServerRegistry {
    entries: Mutex<Vec<ServerEntry>>,
    /// Server -> position in `entries`. Immutable after construction.
    index: HashMap<Server, usize>,
}

impl ServerRegistry {
    /// Build a registry with every server Healthy. Duplicates are collapsed.
    pub fn new(servers: impl IntoIterator<Item = Server>) -> Self {
        let mut entries = Vec::new();
        let mut index = HashMap::new();
        for server in servers {
            if index.contains_key(&server) {
                tracing::warn!(server = %server, "Ignoring duplicate server");
                continue;
            }
            index.insert(server.clone(), entries.len());
            metrics::record_server_health(&server, true);
            entries.push(ServerEntry {
                server,
                health: ServerHealth::Healthy,
                last_failure: None,
                last_probe: None,
            });
        }
        Self {
            entries: Mutex::new(entries),
            index,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ServerEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of configured servers.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, server: &Server) -> bool {
        self.index.contains_key(server)
    }

    /// Every configured server, in configuration order.
    pub fn servers(&self) -> Vec<Server> {
        self.lock().iter().map(|e| e.server.clone()).collect()
    }

    /// Currently healthy servers, in configuration order. May be empty.
    pub fn healthy_servers(&self) -> Vec<Server> {
        self.snapshot(ServerHealth::Healthy)
    }

    /// Currently dead servers, in configuration order.
    pub fn dead_servers(&self) -> Vec<Server> {
        self.snapshot(ServerHealth::Dead)
    }

    fn snapshot(&self, health: ServerHealth) -> Vec<Server> {
        self.lock()
            .iter()
            .filter(|e| e.health == health)
            .map(|e| e.server.clone())
            .collect()
    }

    /// Health of `server`, or `None` if it is not configured here.
    pub fn health(&self, server: &Server) -> Option<ServerHealth> {
        let idx = *self.index.get(server)?;
        self.lock().get(idx).map(|e| e.health)
    }

    pub fn is_healthy(&self, server: &Server) -> bool {
        self.health(server).is_some_and(ServerHealth::is_healthy)
    }

    /// Mark `server` dead and stamp the failure time.
    ///
    /// Returns `true` if this call performed the transition; no-op if already dead.
    pub fn mark_dead(&self, server: &Server) -> bool {
        let Some(&idx) = self.index.get(server) else {
            tracing::debug!(server = %server, "mark_dead for unknown server");
            return false;
        };
        {
            let mut entries = self.lock();
            let entry = &mut entries[idx];
            if entry.health == ServerHealth::Dead {
                return false;
            }
            entry.health = ServerHealth::Dead;
            entry.last_failure = Some(Instant::now());
        }
        tracing::warn!(server = %server, "Server marked dead");
        metrics::record_server_health(server, false);
        true
    }

    /// Mark `server` healthy and clear the failure time.
    ///
    /// Returns `true` if this call performed the transition; no-op if already healthy.
    pub fn mark_healthy(&self, server: &Server) -> bool {
        let Some(&idx) = self.index.get(server) else {
            tracing::debug!(server = %server, "mark_healthy for unknown server");
            return false;
        };
        {
            let mut entries = self.lock();
            let entry = &mut entries[idx];
            if entry.health == ServerHealth::Healthy {
                return false;
            }
            entry.health = ServerHealth::Healthy;
            entry.last_failure = None;
        }
        tracing::info!(server = %server, "Server recovered");
        metrics::record_server_health(server, true);
        true
    }

    /// Stamp the time of a recovery probe against `server`.
    pub fn record_probe(&self, server: &Server) {
        if let Some(&idx) = self.index.get(server) {
            self.lock()[idx].last_probe = Some(Instant::now());
        }
    }

    /// Time of the last recorded failure, if the server is dead.
    pub fn last_failure(&self, server: &Server) -> Option<Instant> {
        let idx = *self.index.get(server)?;
        self.lock()[idx].last_failure
    }

    pub fn last_probe(&self, server: &Server) -> Option<Instant> {
        let idx = *self.index.get(server)?;
        self.lock()[idx].last_probe
    }

    pub fn status(&self) -> Vec<ServerStatus> {
        self.lock()
            .iter()
            .map(|e| ServerStatus {
                address: e.server.to_string(),
                health: e.health,
                since_last_failure: e.last_failure.map(|t| t.elapsed()),
                since_last_probe: e.last_probe.map(|t| t.elapsed()),
            })
            .collect()
    }
}
