//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! FailoverSession needs a binding
//!     → dispatcher.rs (healthy servers minus already-tried ones)
//!     → registry.rs (health snapshot under the registry lock)
//!     → round_robin.rs (rotate through candidates)
//!     → Server to connect to, or None
//! ```
//!
//! # Design Decisions
//! - The registry is the only shared mutable state; everything else reads snapshots
//! - Dead servers are excluded from selection
//! - Selection order is configuration order, rotated per pick

pub mod dispatcher;
pub mod registry;
pub mod round_robin;
pub mod server;

pub use dispatcher::Dispatcher;
pub use registry::{ServerRegistry, ServerStatus};
pub use round_robin::RoundRobin;
pub use server::Server;

/// Selection strategy over an already-filtered candidate list.
pub trait LoadBalancer: Send + Sync {
    fn next_server(&self, candidates: &[Server]) -> Option<Server>;
}
