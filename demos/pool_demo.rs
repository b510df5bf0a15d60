//! Keep pinging a set of line-protocol servers through a failover pool.
//!
//! ```text
//! cargo run --example pool_demo -- demos/failover.toml
//! ```
//!
//! Stop a server while this runs to watch the session fail over, start it
//! again to watch the recovery scheduler bring it back.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use thrift_failover::observability::{logging::init_logging, metrics::init_metrics};
use thrift_failover::{load_config, FailoverConfig, FailoverPool, TcpConnector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => {
            let mut config =
                FailoverConfig::with_servers([("127.0.0.1", 9090), ("127.0.0.1", 9091)]);
            config.recovery_delay_secs = 5;
            config.pool.size = 3;
            config
        }
    };

    init_logging(&config.observability)?;
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        init_metrics(addr)?;
    }

    let pool = FailoverPool::connect(config, TcpConnector::new()).await?;
    let mut session = pool.checkout().await?;
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        let reply = session
            .execute(|conn| {
                async move {
                    let stream = conn.stream_mut()?;
                    stream.write_all(b"ping\n").await?;
                    let mut buf = [0u8; 128];
                    let n = stream.read(&mut buf).await?;
                    if n == 0 {
                        return Err(thrift_failover::ClientError::Transport(
                            "connection closed by peer".to_string(),
                        ));
                    }
                    Ok(String::from_utf8_lossy(&buf[..n]).trim_end().to_string())
                }
                .boxed()
            })
            .await;

        match reply {
            Ok(reply) => tracing::info!(
                server = ?session.server().map(ToString::to_string),
                reply = %reply,
                "Ping"
            ),
            Err(e) => tracing::warn!(error = %e, "Ping failed"),
        }
    }

    drop(session);
    tracing::info!(status = ?pool.status(), "Shutting down");
    pool.shutdown().await;
    Ok(())
}
