//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (FailoverPool::new / connect):
//!     Validate config → Build registry → Spawn recovery task → Optional open()
//!
//! Shutdown (FailoverPool::shutdown):
//!     Trigger broadcast → Recovery task leaves its loop (mid-probe too)
//!     → Join the task → Close idle pooled sessions
//! ```
//!
//! # Design Decisions
//! - Background work is always joinable; nothing is fire-and-forget
//! - Dropping the pool also signals shutdown

pub mod shutdown;

pub use shutdown::Shutdown;
