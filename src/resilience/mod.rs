//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Network step (connect / operation / probe):
//!     → timeouts.rs (enforce per-attempt deadline)
//!     → On connection failure: session marks the server dead and fails over
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Retries are bounded by the server count, not by a budget or backoff
//! - Application errors are never retried

pub mod timeouts;
