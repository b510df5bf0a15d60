//! Errors surfaced to callers of the pool.

use std::time::Duration;

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::config::validation::ValidationError;

/// Errors returned by `FailoverPool` and `FailoverSession`.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Every candidate server failed (or was already dead) within one call.
    #[error("no server available: tried {attempted} of {configured} configured servers")]
    NoServerAvailable { attempted: usize, configured: usize },

    /// The backend rejected the operation; the connection is still good.
    #[error("application error: {0}")]
    Application(String),

    /// No pooled session became free in time.
    #[error("timed out after {0:?} waiting for a pooled session")]
    CheckoutTimeout(Duration),

    /// The pool was built outside a tokio runtime.
    #[error("failover pool must be created inside a tokio runtime")]
    NoRuntime,

    /// The pool has been shut down.
    #[error("pool is shut down")]
    Closed,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl From<Vec<ValidationError>> for PoolError {
    fn from(errors: Vec<ValidationError>) -> Self {
        PoolError::Config(ConfigError::Validation(errors))
    }
}

impl PoolError {
    pub fn is_no_server_available(&self) -> bool {
        matches!(self, PoolError::NoServerAvailable { .. })
    }
}
