//! Metrics collection and exposition.
//!
//! # Metrics
//! - `failover_server_health` (gauge): 1=healthy, 0=dead, per server
//! - `failover_failovers_total` (counter): servers abandoned mid-call, by reason
//! - `failover_recovery_probes_total` (counter): probes by server and outcome
//! - `failover_execute_total` (counter): `execute` calls by outcome
//! - `failover_execute_duration_seconds` (histogram): `execute` latency
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::load_balancer::server::Server;

/// Install the Prometheus exporter listening on `addr`. Needs a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_server_health(server: &Server, healthy: bool) {
    gauge!("failover_server_health", "server" => server.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_failover(server: &Server, reason: &'static str) {
    counter!("failover_failovers_total", "server" => server.to_string(), "reason" => reason)
        .increment(1);
}

pub fn record_probe(server: &Server, recovered: bool) {
    let outcome = if recovered { "recovered" } else { "failed" };
    counter!("failover_recovery_probes_total", "server" => server.to_string(), "outcome" => outcome)
        .increment(1);
}

pub fn record_execute(outcome: &'static str, start: Instant) {
    counter!("failover_execute_total", "outcome" => outcome).increment(1);
    histogram!("failover_execute_duration_seconds").record(start.elapsed().as_secs_f64());
}
