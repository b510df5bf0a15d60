//! Transport abstraction consumed by the failover layer.
//!
//! # Responsibilities
//! - Establish a connection to one server (`Connector`)
//! - Close a connection (`Connection`)
//! - Classify failures: connection-level failures trigger failover,
//!   application errors pass through untouched
//!
//! Operations themselves are plain async methods on the concrete
//! connection type; the session runs them through a caller-supplied closure.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::load_balancer::server::Server;

/// Errors raised by the underlying client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Establishing a connection to a server failed.
    #[error("connect error: {0}")]
    Connect(String),

    /// The transport broke mid-operation.
    #[error("transport error: {0}")]
    Transport(String),

    /// A network step exceeded its deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with an error unrelated to connectivity.
    #[error("application error: {0}")]
    Application(String),
}

impl ClientError {
    /// Whether this error means the server should be considered dead.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Connect(_) | ClientError::Transport(_) | ClientError::Timeout(_)
        )
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Connect(_) => "connect",
            ClientError::Transport(_) => "transport",
            ClientError::Timeout(_) => "timeout",
            ClientError::Application(_) => "application",
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

/// A live session to exactly one server.
#[async_trait]
pub trait Connection: Send + 'static {
    /// Release the underlying transport. Calling it twice is harmless.
    async fn close(&mut self) -> Result<(), ClientError>;
}

/// Factory for connections to a given server.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Connection: Connection;

    /// Open a new connection to `server`.
    async fn connect(&self, server: &Server) -> Result<Self::Connection, ClientError>;
}
