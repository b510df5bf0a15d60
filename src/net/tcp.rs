//! Plain TCP connector.
//!
//! Enough for reachability probes and for clients that speak their own
//! protocol over a raw stream.

use std::io;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::load_balancer::server::Server;
use crate::net::connection::{ClientError, Connection, Connector};

/// Opens `TcpStream`s to configured servers.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    nodelay: bool,
}

impl TcpConnector {
    pub fn new() -> Self {
        Self { nodelay: true }
    }

    /// Toggle `TCP_NODELAY` on new streams.
    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for TcpConnector {
    type Connection = TcpConnection;

    async fn connect(&self, server: &Server) -> Result<TcpConnection, ClientError> {
        let stream = TcpStream::connect((server.host.as_str(), server.port))
            .await
            .map_err(|e| ClientError::Connect(format!("{}: {}", server, e)))?;
        stream
            .set_nodelay(self.nodelay)
            .map_err(|e| ClientError::Connect(format!("{}: {}", server, e)))?;
        tracing::trace!(server = %server, "TCP connection established");
        Ok(TcpConnection {
            server: server.clone(),
            stream: Some(stream),
        })
    }
}

/// A TCP stream bound to one server.
#[derive(Debug)]
pub struct TcpConnection {
    server: Server,
    stream: Option<TcpStream>,
}

impl TcpConnection {
    pub fn server(&self) -> &Server {
        &self.server
    }

    /// The open stream, or a transport error once closed.
    pub fn stream_mut(&mut self) -> Result<&mut TcpStream, ClientError> {
        self.stream
            .as_mut()
            .ok_or_else(|| ClientError::Transport(format!("{}: connection closed", self.server)))
    }
}

#[async_trait]
impl Connection for TcpConnection {
    async fn close(&mut self) -> Result<(), ClientError> {
        if let Some(mut stream) = self.stream.take() {
            match stream.shutdown().await {
                Ok(()) => {}
                // Peer already gone.
                Err(e) if e.kind() == io::ErrorKind::NotConnected => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
