//! Fault-tolerant connection manager for interchangeable RPC servers.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                    FAILOVER POOL                     │
//!                    │                                                      │
//!   caller           │  ┌───────────────┐   select   ┌──────────────────┐   │
//!   ─────────────────┼─▶│FailoverSession│──────────▶│    Dispatcher    │   │
//!   execute(op)      │  │ (1 bound conn)│           │  (round robin)   │   │
//!                    │  └───────┬───────┘           └────────┬─────────┘   │
//!                    │          │ connect / op               │ healthy     │
//!                    │          ▼                            ▼             │
//!                    │  ┌───────────────┐  mark_dead  ┌──────────────────┐  │
//!   server A ◀───────┼──│   Connector   │            │  ServerRegistry  │  │
//!   server B ◀───────┼──│  (tcp / own)  │            │ (single lock)    │  │
//!   server C ◀───────┼──│               │            └────────▲─────────┘  │
//!                    │  └───────▲───────┘                     │ mark_healthy│
//!                    │          │ probe every recovery_delay  │             │
//!                    │  ┌───────┴──────────────────────────────┴─────────┐  │
//!                    │  │              RecoveryScheduler (task)          │  │
//!                    │  └────────────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use futures_util::FutureExt;
//! use thrift_failover::{FailoverConfig, FailoverPool, TcpConnector};
//! use tokio::io::AsyncWriteExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FailoverConfig::with_servers([("10.6.30.132", 9090), ("10.6.30.133", 9090)]);
//! let pool = FailoverPool::connect(config, TcpConnector::new()).await?;
//!
//! let mut session = pool.checkout().await?;
//! session
//!     .execute(|conn| {
//!         async move {
//!             conn.stream_mut()?.write_all(b"ping\n").await?;
//!             Ok::<_, thrift_failover::ClientError>(())
//!         }
//!         .boxed()
//!     })
//!     .await?;
//!
//! drop(session);
//! pool.shutdown().await;
//! # Ok(())
//! # }
//! ```

// Core subsystems
pub mod config;
pub mod error;
pub mod net;
pub mod pool;
pub mod session;

// Traffic management
pub mod health;
pub mod load_balancer;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::{load_config, FailoverConfig};
pub use error::PoolError;
pub use health::ServerHealth;
pub use load_balancer::{Server, ServerRegistry};
pub use net::{ClientError, Connection, Connector, TcpConnection, TcpConnector};
pub use pool::FailoverPool;
pub use session::{FailoverSession, PooledSession};
