//! Background recovery of dead servers.
//!
//! # Responsibilities
//! - Every `recovery_delay`, probe each dead server with a fresh connection
//! - Promote reachable servers back to healthy
//! - Stay silent about failed probes beyond a debug log and a metric

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::load_balancer::{registry::ServerRegistry, server::Server};
use crate::net::connection::{ClientError, Connection, Connector};
use crate::observability::metrics;
use crate::resilience::timeouts::with_timeout;

pub struct RecoveryScheduler<C: Connector> {
    registry: Arc<ServerRegistry>,
    connector: Arc<C>,
    delay: Duration,
    connect_timeout: Duration,
}

impl<C: Connector> RecoveryScheduler<C> {
    pub fn new(
        registry: Arc<ServerRegistry>,
        connector: Arc<C>,
        delay: Duration,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            connector,
            delay,
            connect_timeout,
        }
    }

    /// Run recovery cycles until `shutdown` fires or its sender is dropped.
    ///
    /// The first cycle runs one full `delay` after start. A shutdown that
    /// arrives mid-cycle drops the in-flight probe, which releases its socket.
    pub async fn run(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            delay_secs = self.delay.as_secs_f64(),
            servers = self.registry.len(),
            "Recovery scheduler starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.delay, self.delay);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tokio::select! {
                        _ = self.probe_dead_servers() => {}
                        _ = shutdown.recv() => break,
                    }
                }
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!("Recovery scheduler stopped");
    }

    /// Probe every currently dead server once. Returns how many recovered.
    pub async fn probe_dead_servers(&self) -> usize {
        // Snapshot only; the registry lock is not held across probes.
        let dead = self.registry.dead_servers();
        if dead.is_empty() {
            return 0;
        }
        tracing::debug!(dead = dead.len(), "Running recovery cycle");

        let mut recovered = 0;
        for server in dead {
            if self.probe(&server).await {
                recovered += 1;
            }
        }
        recovered
    }

    /// Connect to `server` and close immediately. Marks it healthy on success.
    ///
    /// Both steps share the connect timeout; a close that stalls does not
    /// hold back the verdict.
    pub async fn probe(&self, server: &Server) -> bool {
        let outcome = with_timeout(self.connect_timeout, self.connector.connect(server)).await;
        self.registry.record_probe(server);

        match outcome {
            Ok(mut conn) => {
                match with_timeout(self.connect_timeout, conn.close()).await {
                    Ok(()) => {}
                    Err(ClientError::Timeout(_)) => {
                        tracing::debug!(server = %server, "Closing recovery connection timed out");
                    }
                    Err(e) => {
                        tracing::debug!(server = %server, error = %e, "Closing recovery connection failed");
                    }
                }
                self.registry.mark_healthy(server);
                metrics::record_probe(server, true);
                true
            }
            Err(e) => {
                tracing::debug!(server = %server, error = %e, "Recovery probe failed");
                metrics::record_probe(server, false);
                false
            }
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
