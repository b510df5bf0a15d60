//! Failover sessions.
//!
//! # Data Flow
//! ```text
//! caller → FailoverSession::execute(operation)
//!     → Dispatcher::select(exclude = tried)
//!         → same server as the binding? reuse it
//!         → else close binding (deadline), Connector::connect (deadline)
//!             ── fail → mark_dead, try next
//!     → operation(&mut connection) (deadline)
//!         → Ok                     → return unchanged
//!         → connection failure     → mark_dead, discard binding, try next
//!         → application error      → return, binding kept
//!     → every candidate tried      → NoServerAvailable
//! ```
//!
//! # Design Decisions
//! - At most one bound connection per session; never shared
//! - Selection happens on every call, so one session still rotates servers
//! - The retry loop is bounded by an explicit exclusion set, one entry per server
//! - Only connection failures trigger failover

pub mod pooled;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::BoxFuture;
use uuid::Uuid;

use crate::error::PoolError;
use crate::load_balancer::{dispatcher::Dispatcher, registry::ServerRegistry, server::Server};
use crate::net::connection::{ClientError, Connection, Connector};
use crate::observability::metrics;
use crate::resilience::timeouts::with_timeout;

pub use pooled::{PooledSession, SessionPool};

/// Shared pieces every session of a pool needs.
pub struct SessionContext<C: Connector> {
    pub(crate) dispatcher: Arc<Dispatcher>,
    pub(crate) connector: Arc<C>,
    pub(crate) connect_timeout: Duration,
    pub(crate) operation_timeout: Duration,
}

impl<C: Connector> SessionContext<C> {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        connector: Arc<C>,
        connect_timeout: Duration,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            dispatcher,
            connector,
            connect_timeout,
            operation_timeout,
        }
    }

    fn registry(&self) -> &Arc<ServerRegistry> {
        self.dispatcher.registry()
    }
}

impl<C: Connector> Clone for SessionContext<C> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            connector: self.connector.clone(),
            connect_timeout: self.connect_timeout,
            operation_timeout: self.operation_timeout,
        }
    }
}

struct BoundConnection<T> {
    server: Server,
    connection: T,
}

/// Caller-facing connection handle that hides server topology and failover.
pub struct FailoverSession<C: Connector> {
    id: Uuid,
    context: SessionContext<C>,
    bound: Option<BoundConnection<C::Connection>>,
}

impl<C: Connector> FailoverSession<C> {
    pub fn new(context: SessionContext<C>) -> Self {
        Self {
            id: Uuid::new_v4(),
            context,
            bound: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Server the session is currently bound to, if any.
    pub fn server(&self) -> Option<&Server> {
        self.bound.as_ref().map(|b| &b.server)
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Run `operation` against a healthy server, failing over on connection errors.
    ///
    /// Every call asks the dispatcher for a server, so successive calls rotate
    /// across the healthy set. The bound connection is reused when the pick
    /// matches it and replaced otherwise.
    ///
    /// The operation may run more than once, each time on a different server,
    /// so it should be safe to repeat. Application errors are returned at once
    /// and keep the binding.
    pub async fn execute<T, F>(&mut self, mut operation: F) -> Result<T, PoolError>
    where
        F: for<'c> FnMut(&'c mut C::Connection) -> BoxFuture<'c, Result<T, ClientError>> + Send,
        T: Send,
    {
        let start = Instant::now();
        let configured = self.context.registry().len();
        let mut tried: HashSet<Server> = HashSet::with_capacity(configured);

        loop {
            let Some(server) = self.context.dispatcher.select(&tried) else {
                tracing::warn!(
                    session_id = %self.id,
                    attempted = tried.len(),
                    configured,
                    "No server available"
                );
                // Any binding left here points at a dead server.
                self.release().await;
                metrics::record_execute("no_server", start);
                return Err(PoolError::NoServerAvailable {
                    attempted: tried.len(),
                    configured,
                });
            };
            tried.insert(server.clone());

            if self.server() != Some(&server) {
                // At most one bound connection: let go of the previous server first.
                self.release().await;
                if !self.bind(server.clone()).await {
                    continue;
                }
            }

            let Some(bound) = self.bound.as_mut() else {
                continue;
            };

            let result = with_timeout(
                self.context.operation_timeout,
                operation(&mut bound.connection),
            )
            .await;

            match result {
                Ok(value) => {
                    metrics::record_execute("ok", start);
                    return Ok(value);
                }
                Err(e) if e.is_connection_failure() => {
                    tracing::warn!(
                        session_id = %self.id,
                        server = %server,
                        attempt = tried.len(),
                        error = %e,
                        "Operation failed, failing over"
                    );
                    metrics::record_failover(&server, e.kind());
                    self.context.registry().mark_dead(&server);
                    self.release().await;
                }
                Err(e) => {
                    metrics::record_execute("application_error", start);
                    return Err(PoolError::Application(match e {
                        ClientError::Application(msg) => msg,
                        other => other.to_string(),
                    }));
                }
            }
        }
    }

    /// Try to bind to `server`. Marks it dead on failure.
    async fn bind(&mut self, server: Server) -> bool {
        let connect = self.context.connector.connect(&server);
        match with_timeout(self.context.connect_timeout, connect).await {
            Ok(connection) => {
                tracing::debug!(session_id = %self.id, server = %server, "Bound to server");
                self.bound = Some(BoundConnection { server, connection });
                true
            }
            Err(e) => {
                tracing::warn!(session_id = %self.id, server = %server, error = %e, "Connect failed");
                metrics::record_failover(&server, e.kind());
                self.context.registry().mark_dead(&server);
                false
            }
        }
    }

    async fn release(&mut self) {
        if let Some(bound) = self.bound.take() {
            close_bound(self.id, bound, self.context.connect_timeout).await;
        }
    }

    /// Release the bound connection, if any. Safe to call repeatedly.
    pub async fn close(&mut self) {
        if self.bound.is_some() {
            tracing::debug!(session_id = %self.id, "Closing session");
        }
        self.release().await;
    }
}

/// Close `bound` under `limit`. A close that errors or stalls only gets logged;
/// the connection is dropped either way.
async fn close_bound<T: Connection>(session_id: Uuid, mut bound: BoundConnection<T>, limit: Duration) {
    match with_timeout(limit, bound.connection.close()).await {
        Ok(()) => {}
        Err(ClientError::Timeout(_)) => {
            tracing::debug!(%session_id, server = %bound.server, "Close timed out, dropping connection");
        }
        Err(e) => {
            tracing::debug!(%session_id, server = %bound.server, error = %e, "Close failed");
        }
    }
}

impl<C: Connector> Drop for FailoverSession<C> {
    /// Best-effort close of a binding the caller never released.
    ///
    /// Without a runtime the connection is only dropped.
    fn drop(&mut self) {
        let Some(bound) = self.bound.take() else {
            return;
        };
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tracing::debug!(session_id = %self.id, server = %bound.server, "Session dropped while bound");
            handle.spawn(close_bound(self.id, bound, self.context.connect_timeout));
        }
    }
}

impl<C: Connector> fmt::Debug for FailoverSession<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailoverSession")
            .field("id", &self.id)
            .field("server", &self.server())
            .finish()
    }
}
