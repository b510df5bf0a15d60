//! Server health state machine.
//!
//! # States
//! - Healthy: server is eligible for selection
//! - Dead: server excluded from selection until a recovery probe succeeds
//!
//! # State Transitions
//! ```text
//! Healthy → Dead:    connection failure observed by a session (or failed open)
//! Dead → Healthy:    recovery probe succeeds
//! Dead → Dead:       recovery probe fails (retried next cycle)
//! ```
//!
//! # Design Decisions
//! - No hysteresis: one connection failure is enough to fail over
//! - No permanent removal; dead servers are probed forever
//! - Transitions only happen through `ServerRegistry`

use std::fmt;

use serde::Serialize;

/// Binary health classification of a configured server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerHealth {
    Healthy,
    Dead,
}

impl ServerHealth {
    pub fn is_healthy(self) -> bool {
        self == ServerHealth::Healthy
    }
}

impl fmt::Display for ServerHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerHealth::Healthy => f.write_str("healthy"),
            ServerHealth::Dead => f.write_str("dead"),
        }
    }
}
