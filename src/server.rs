#![cfg(feature = "std")]

use std::future::Future;
use std::net::SocketAddr;

use log::{debug, info, warn};
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio::time::Duration;

use crate::config::ServerConfig;
use crate::registry::{MatchRegistry, RegistryHandle};
use crate::session::serve_connection;
use crate::transport::tcp::{FrameLimits, TcpTransport};

/// TCP front end of the match engine.
pub struct Server {
    listener: TcpListener,
    limits: FrameLimits,
    idle_timeout: Duration,
    registry: RegistryHandle,
}

impl Server {
    /// Bind the listener and start the registry task.
    pub async fn bind(config: ServerConfig) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&config.bind).await?;
        info!("listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            limits: FrameLimits::from(&config),
            idle_timeout: config.idle_timeout,
            registry: MatchRegistry::spawn(),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` resolves, then stop every room
    /// and drop the remaining lobby sessions.
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut sessions = JoinSet::new();
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => {
                    let (stream, addr) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!("accept failed: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = stream.set_nodelay(true) {
                        debug!("set_nodelay failed for {}: {}", addr, e);
                    }
                    info!("connection from {}", addr);
                    let registry = self.registry.clone();
                    let idle_timeout = self.idle_timeout;
                    let transport = TcpTransport::with_limits(stream, self.limits);
                    sessions.spawn(async move {
                        if let Err(e) = serve_connection(registry, transport, idle_timeout).await {
                            debug!("session for {} ended: {}", addr, e);
                        }
                    });
                }
            }
            while sessions.try_join_next().is_some() {}
        }

        info!("shutting down");
        if let Err(e) = self.registry.shutdown().await {
            debug!("{}", e);
        }
        sessions.shutdown().await;
        Ok(())
    }
}
