//! Server selection for failover sessions.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::load_balancer::{registry::ServerRegistry, server::Server, LoadBalancer};

/// Chooses which healthy server a session binds to next.
///
/// One dispatcher is shared by every session of a pool, so the rotation
/// spreads bindings across sessions as well as across retries.
pub struct Dispatcher {
    registry: Arc<ServerRegistry>,
    balancer: Box<dyn LoadBalancer>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ServerRegistry>, balancer: Box<dyn LoadBalancer>) -> Self {
        Self { registry, balancer }
    }

    /// Pick a healthy server not in `exclude`.
    ///
    /// `None` means no server is available for this call.
    pub fn select(&self, exclude: &HashSet<Server>) -> Option<Server> {
        let candidates: Vec<Server> = self
            .registry
            .healthy_servers()
            .into_iter()
            .filter(|s| !exclude.contains(s))
            .collect();

        let selected = self.balancer.next_server(&candidates);
        if selected.is_none() {
            tracing::debug!(
                configured = self.registry.len(),
                excluded = exclude.len(),
                "No healthy server left to select"
            );
        }
        selected
    }

    pub fn registry(&self) -> &Arc<ServerRegistry> {
        &self.registry
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("servers", &self.registry.len())
            .finish()
    }
}
