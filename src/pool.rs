//! Caller-facing entry point.
//!
//! `FailoverPool` wires the registry, dispatcher, session pool and recovery
//! scheduler together from one validated `FailoverConfig`.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::runtime::Handle;
use crate::config::schema::FailoverConfig;
use crate::config::validation::validate_config;
use crate::error::PoolError;
use crate::health::recovery::RecoveryScheduler;
use crate::lifecycle::Shutdown;
use crate::load_balancer::{
    dispatcher::Dispatcher,
    registry::{ServerRegistry, ServerStatus},
    round_robin::RoundRobin,
};
use crate::net::connection::Connector;
use crate::session::{FailoverSession, PooledSession, SessionContext, SessionPool};

/// Fault-tolerant connection manager for a fixed set of interchangeable servers.
pub struct FailoverPool<C: Connector> {
    config: FailoverConfig,
    registry: Arc<ServerRegistry>,
    context: SessionContext<C>,
    sessions: Arc<SessionPool<C>>,
    scheduler: Arc<RecoveryScheduler<C>>,
    shutdown: Shutdown,
}

impl<C: Connector> FailoverPool<C> {
    /// Validate `config`, build the registry and start the recovery scheduler.
    ///
    /// Fails with `NoRuntime` outside a tokio runtime. No connection is made
    /// here; see [`FailoverPool::connect`] for the eager variant.
    pub fn new(config: FailoverConfig, connector: C) -> Result<Self, PoolError> {
        validate_config(&config)?;
        let runtime = Handle::try_current().map_err(|_| PoolError::NoRuntime)?;

        let servers = config.resolved_servers();
        let registry = Arc::new(ServerRegistry::new(servers));
        let dispatcher = Arc::new(Dispatcher::new(registry.clone(), Box::new(RoundRobin::new())));
        let connector = Arc::new(connector);

        let context = SessionContext::new(
            dispatcher,
            connector.clone(),
            config.timeouts.connect(),
            config.timeouts.operation(),
        );
        let sessions = Arc::new(SessionPool::new(
            context.clone(),
            config.pool.size,
            config.pool.acquire_timeout_ms.map(Duration::from_millis),
        ));

        let scheduler = Arc::new(RecoveryScheduler::new(
            registry.clone(),
            connector,
            config.recovery_delay(),
            config.timeouts.connect(),
        ));
        let shutdown = Shutdown::new();
        shutdown.spawn(&runtime, "recovery", |rx| scheduler.clone().run(rx));

        tracing::info!(
            servers = registry.len(),
            recovery_delay_secs = config.recovery_delay_secs,
            pool_size = config.pool.size,
            "Failover pool created"
        );

        Ok(Self {
            config,
            registry,
            context,
            sessions,
            scheduler,
            shutdown,
        })
    }

    /// Build the pool and, when `autoconnect` is set, `open()` it.
    pub async fn connect(config: FailoverConfig, connector: C) -> Result<Self, PoolError> {
        let autoconnect = config.autoconnect;
        let pool = Self::new(config, connector)?;
        if autoconnect {
            if let Err(e) = pool.open().await {
                pool.shutdown().await;
                return Err(e);
            }
        }
        Ok(pool)
    }

    /// Probe every configured server concurrently and record the result.
    ///
    /// Returns the number of reachable servers, or `NoServerAvailable` if none are.
    pub async fn open(&self) -> Result<usize, PoolError> {
        let servers = self.registry.servers();
        let probes = servers.iter().map(|server| async move {
            let reachable = self.scheduler.probe(server).await;
            if !reachable {
                tracing::warn!(server = %server, "Connect failed during open");
                self.registry.mark_dead(server);
            }
            reachable
        });
        let healthy = join_all(probes).await.into_iter().filter(|ok| *ok).count();

        if healthy == 0 {
            return Err(PoolError::NoServerAvailable {
                attempted: servers.len(),
                configured: servers.len(),
            });
        }
        tracing::info!(healthy, configured = servers.len(), "Failover pool opened");
        Ok(healthy)
    }

    /// A standalone session, not counted against the pool size.
    pub fn session(&self) -> FailoverSession<C> {
        FailoverSession::new(self.context.clone())
    }

    /// Check out a pooled session; it returns to the pool when dropped.
    pub async fn checkout(&self) -> Result<PooledSession<C>, PoolError> {
        self.sessions.checkout().await
    }

    /// Run one recovery cycle now. Returns how many servers recovered.
    pub async fn probe_now(&self) -> usize {
        self.scheduler.probe_dead_servers().await
    }

    pub fn registry(&self) -> &Arc<ServerRegistry> {
        &self.registry
    }

    pub fn sessions(&self) -> &Arc<SessionPool<C>> {
        &self.sessions
    }

    pub fn status(&self) -> Vec<ServerStatus> {
        self.registry.status()
    }

    pub fn config(&self) -> &FailoverConfig {
        &self.config
    }

    /// Stop the recovery scheduler, wait for it to exit and close idle sessions.
    ///
    /// Idempotent. Sessions still checked out are dropped when returned.
    pub async fn shutdown(&self) {
        self.shutdown.stop().await;
        self.sessions.close().await;
    }

    /// Whether the recovery scheduler is still running.
    pub fn is_running(&self) -> bool {
        self.shutdown.running() > 0
    }
}

impl<C: Connector> Drop for FailoverPool<C> {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

impl<C: Connector> std::fmt::Debug for FailoverPool<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverPool")
            .field("config", &self.config)
            .field("shutdown", &self.shutdown)
            .finish_non_exhaustive()
    }
}
