//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! FailoverSession / RecoveryScheduler
//!     → connection.rs (Connector::connect, Connection::close)
//!     → tcp.rs (stock TCP implementation) or a caller-provided client
//!     → ClientError classifies the outcome
//! ```
//!
//! # Design Decisions
//! - The wire protocol is the caller's business; only connect/close are fixed
//! - Connect, transport and timeout errors are connection failures
//! - Application errors are never treated as connection failures

pub mod connection;
pub mod tcp;

pub use connection::{ClientError, Connection, Connector};
pub use tcp::{TcpConnection, TcpConnector};
