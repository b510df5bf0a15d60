//! Health tracking subsystem.
//!
//! # Data Flow
//! ```text
//! Passive detection (session/):
//!     Connection failure during execute()
//!     → ServerRegistry::mark_dead
//!
//! Active recovery (recovery.rs):
//!     Periodic timer
//!     → Probe each dead server (connect + close)
//!     → ServerRegistry::mark_healthy on success
//!
//! State machine (state.rs):
//!     Healthy ←→ Dead
//! ```
//!
//! # Design Decisions
//! - Healthy servers are never probed; traffic is the health check
//! - Dead servers are probed forever, never removed
//! - Health state is per-server and lives only in the registry

pub mod recovery;
pub mod state;

pub use recovery::RecoveryScheduler;
pub use state::ServerHealth;
