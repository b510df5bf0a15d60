//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::{JoinHandle, JoinSet};

use thrift_failover::config::TimeoutConfig;
use thrift_failover::{ClientError, Connection, Connector, FailoverConfig, Server};

#[derive(Debug, Default)]
struct Behavior {
    unreachable: bool,
    broken: bool,
    hang: bool,
    hang_close: bool,
    connects: usize,
    calls: usize,
    closes: usize,
}

#[derive(Debug, Default)]
struct MockState {
    servers: HashMap<Server, Behavior>,
    open: usize,
}

/// In-memory connector whose servers can be taken down and brought back.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, server: &Server, f: impl FnOnce(&mut Behavior) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(state.servers.entry(server.clone()).or_default())
    }

    /// Refuse new connections and break existing ones.
    pub fn take_down(&self, server: &Server) {
        self.with(server, |b| b.unreachable = true);
    }

    pub fn bring_up(&self, server: &Server) {
        self.with(server, |b| {
            b.unreachable = false;
            b.broken = false;
            b.hang = false;
            b.hang_close = false;
        });
    }

    /// Accept connections but fail every operation with a transport error.
    pub fn break_calls(&self, server: &Server) {
        self.with(server, |b| b.broken = true);
    }

    /// Accept connections but never answer operations.
    pub fn hang_calls(&self, server: &Server) {
        self.with(server, |b| b.hang = true);
    }

    /// Accept connections whose `close` never completes.
    pub fn hang_close(&self, server: &Server) {
        self.with(server, |b| b.hang_close = true);
    }

    pub fn connects(&self, server: &Server) -> usize {
        self.with(server, |b| b.connects)
    }

    pub fn calls(&self, server: &Server) -> usize {
        self.with(server, |b| b.calls)
    }

    /// Explicit `close` calls that completed.
    pub fn closes(&self, server: &Server) -> usize {
        self.with(server, |b| b.closes)
    }

    /// Connections opened and not yet closed or dropped.
    pub fn open_connections(&self) -> usize {
        self.state.lock().unwrap().open
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Connection = MockConnection;

    async fn connect(&self, server: &Server) -> Result<MockConnection, ClientError> {
        let mut state = self.state.lock().unwrap();
        let behavior = state.servers.entry(server.clone()).or_default();
        behavior.connects += 1;
        if behavior.unreachable {
            return Err(ClientError::Connect(format!("{}: connection refused", server)));
        }
        state.open += 1;
        Ok(MockConnection {
            server: server.clone(),
            state: self.state.clone(),
            closed: false,
        })
    }
}

#[derive(Debug)]
pub struct MockConnection {
    server: Server,
    state: Arc<Mutex<MockState>>,
    closed: bool,
}

impl MockConnection {
    pub fn server(&self) -> &Server {
        &self.server
    }

    /// Echo `op` tagged with the server address. `"app-error"` fails at the
    /// application level.
    pub async fn call(&mut self, op: &str) -> Result<String, ClientError> {
        let hang = {
            let mut state = self.state.lock().unwrap();
            let behavior = state.servers.entry(self.server.clone()).or_default();
            if behavior.unreachable || behavior.broken {
                return Err(ClientError::Transport(format!("{}: broken pipe", self.server)));
            }
            if op == "app-error" {
                return Err(ClientError::Application("table not found".to_string()));
            }
            behavior.calls += 1;
            behavior.hang
        };
        if hang {
            std::future::pending::<()>().await;
        }
        Ok(format!("{}@{}", op, self.server))
    }

    fn mark_closed(&mut self) {
        if !self.closed {
            self.closed = true;
            self.state.lock().unwrap().open -= 1;
        }
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn close(&mut self) -> Result<(), ClientError> {
        let hang = {
            let mut state = self.state.lock().unwrap();
            let behavior = state.servers.entry(self.server.clone()).or_default();
            if !behavior.hang_close && !self.closed {
                behavior.closes += 1;
            }
            behavior.hang_close
        };
        if hang {
            std::future::pending::<()>().await;
        }
        self.mark_closed();
        Ok(())
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.mark_closed();
    }
}

fn operation<F>(f: F) -> F
where
    F: for<'c> FnMut(&'c mut MockConnection) -> BoxFuture<'c, Result<String, ClientError>> + Send,
{
    f
}

/// Operation closure calling `MockConnection::call(op)`.
pub fn op(
    name: &'static str,
) -> impl for<'c> FnMut(&'c mut MockConnection) -> BoxFuture<'c, Result<String, ClientError>> + Send
{
    operation(move |conn| conn.call(name).boxed())
}

pub fn servers(n: u16) -> Vec<Server> {
    (0..n).map(|i| Server::new(format!("hbase-{}", i), 9090)).collect()
}

/// Config for `servers`, no autoconnect, short timeouts.
pub fn config_for(servers: &[Server], recovery_delay_secs: u64) -> FailoverConfig {
    let mut config = FailoverConfig::with_servers(servers.iter().map(|s| (s.host.clone(), s.port)));
    config.recovery_delay_secs = recovery_delay_secs;
    config.autoconnect = false;
    config.timeouts = TimeoutConfig {
        connect_ms: 200,
        operation_ms: 500,
    };
    config
}

/// A line-echo TCP backend. Lines starting with `fail` get an `ERR` reply.
pub struct EchoServer {
    pub addr: SocketAddr,
    task: JoinHandle<()>,
}

impl EchoServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let task = tokio::spawn(async move {
            let mut connections = JoinSet::new();
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                connections.spawn(async move {
                    let (read, mut write) = socket.into_split();
                    let mut lines = BufReader::new(read).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        let reply = if line.starts_with("fail") {
                            format!("ERR {}\n", line)
                        } else {
                            format!("{}\n", line)
                        };
                        if write.write_all(reply.as_bytes()).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });

        Self { addr, task }
    }

    pub fn server(&self) -> Server {
        Server::new("127.0.0.1", self.addr.port())
    }

    /// Stop accepting and drop every open connection.
    pub async fn stop(self) {
        self.task.abort();
        let _ = self.task.await;
        // Let the kernel deliver the resets.
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// A port with nothing listening on it.
pub async fn closed_port() -> Server {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Server::new("127.0.0.1", port)
}
