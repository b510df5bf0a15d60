//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registry transitions, failovers, recovery probes, execute outcomes:
//!     → tracing events (structured fields: server, session_id, attempt)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//!     → Prometheus exporter (optional)
//! ```
//!
//! # Design Decisions
//! - Health transitions are logged once, by whoever wins the transition
//! - Recovery probe failures log at debug; they are steady-state noise
//! - Metrics are cheap and no-op without a recorder

pub mod logging;
pub mod metrics;
