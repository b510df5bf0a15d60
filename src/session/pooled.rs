//! Bounded pool of reusable failover sessions.
//!
//! # Responsibilities
//! - Limit how many sessions are checked out at once
//! - Reuse idle sessions (and their bound connections)
//! - Return sessions automatically when the guard drops

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::PoolError;
use crate::net::connection::Connector;
use crate::session::{FailoverSession, SessionContext};

pub struct SessionPool<C: Connector> {
    context: SessionContext<C>,
    idle: Mutex<Vec<FailoverSession<C>>>,
    permits: Arc<Semaphore>,
    size: usize,
    acquire_timeout: Option<Duration>,
    closed: AtomicBool,
}

impl<C: Connector> SessionPool<C> {
    pub fn new(context: SessionContext<C>, size: usize, acquire_timeout: Option<Duration>) -> Self {
        Self {
            context,
            idle: Mutex::new(Vec::with_capacity(size)),
            permits: Arc::new(Semaphore::new(size)),
            size,
            acquire_timeout,
            closed: AtomicBool::new(false),
        }
    }

    /// Check out a session, waiting for a free slot if all are in use.
    pub async fn checkout(self: &Arc<Self>) -> Result<PooledSession<C>, PoolError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PoolError::Closed);
        }

        let acquire = self.permits.clone().acquire_owned();
        let permit = match self.acquire_timeout {
            Some(limit) => tokio::time::timeout(limit, acquire)
                .await
                .map_err(|_| PoolError::CheckoutTimeout(limit))?,
            None => acquire.await,
        }
        .map_err(|_| PoolError::Closed)?;

        let reused = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        let session = reused.unwrap_or_else(|| {
            let session = FailoverSession::new(self.context.clone());
            tracing::debug!(session_id = %session.id(), "Created pooled session");
            session
        });

        Ok(PooledSession {
            session: Some(session),
            pool: self.clone(),
            _permit: permit,
        })
    }

    /// Sessions currently waiting in the idle stack.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Sessions currently checked out.
    pub fn in_use(&self) -> usize {
        self.size - self.permits.available_permits()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Refuse new checkouts and close every idle session.
    pub async fn close(&self) {
        let idle = {
            // Flag and drain under the idle lock so `give_back` cannot slip a
            // session in between.
            let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
            self.closed.store(true, Ordering::Release);
            self.permits.close();
            std::mem::take(&mut *idle)
        };
        for mut session in idle {
            session.close().await;
        }
    }

    fn give_back(&self, session: FailoverSession<C>) {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if self.closed.load(Ordering::Acquire) {
            drop(idle);
            // Dropping closes the bound connection in the background.
            drop(session);
            return;
        }
        idle.push(session);
    }
}

/// A checked-out session. Returns itself to the pool on drop.
pub struct PooledSession<C: Connector> {
    session: Option<FailoverSession<C>>,
    pool: Arc<SessionPool<C>>,
    _permit: OwnedSemaphorePermit,
}

impl<C: Connector> Deref for PooledSession<C> {
    type Target = FailoverSession<C>;

    fn deref(&self) -> &Self::Target {
        // Only `drop` takes the session out.
        self.session.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl<C: Connector> DerefMut for PooledSession<C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<C: Connector> Drop for PooledSession<C> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            self.pool.give_back(session);
        }
    }
}

impl<C: Connector> std::fmt::Debug for PooledSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledSession")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
