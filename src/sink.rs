#![cfg(feature = "std")]
//! Outbound side of a connection as seen by the match engine.

use log::{debug, warn};
use tokio::sync::{mpsc, watch};

use crate::protocol::Response;
use crate::transport::BoxSender;

/// The only capability rooms and the registry have over a connection.
#[async_trait::async_trait]
pub trait ResponseSink: Send + Sync {
    /// Queue a response. Never blocks; responses to a closed connection
    /// are dropped.
    fn send(&self, response: Response);

    /// Close the connection once every queued response has been written.
    fn close(&self);

    /// Resolves once a write to the connection has failed. Never resolves
    /// for a connection that is only closed.
    async fn failed(&self) {
        std::future::pending::<()>().await
    }
}

/// Item queued for a connection's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Response(Response),
    Close,
}

/// Handle to a connection's writer task.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<Outbound>,
    failed: watch::Receiver<bool>,
}

impl Outbox {
    /// Spawn a writer task draining the outbox into `sender`.
    pub fn spawn(sender: BoxSender<Response>) -> Outbox {
        let (tx, rx) = mpsc::unbounded_channel();
        let (failed_tx, failed) = watch::channel(false);
        tokio::spawn(write_loop(rx, sender, failed_tx));
        Outbox { tx, failed }
    }
}

#[async_trait::async_trait]
impl ResponseSink for Outbox {
    fn send(&self, response: Response) {
        if self.tx.send(Outbound::Response(response)).is_err() {
            debug!("dropping response for closed connection");
        }
    }

    fn close(&self) {
        let _ = self.tx.send(Outbound::Close);
    }

    async fn failed(&self) {
        let mut failed = self.failed.clone();
        // The writer dropping its end without a failure means a clean close.
        let closed = failed.wait_for(|failed| *failed).await.is_err();
        if closed {
            std::future::pending::<()>().await
        }
    }
}

async fn write_loop(
    mut rx: mpsc::UnboundedReceiver<Outbound>,
    mut sender: BoxSender<Response>,
    failed: watch::Sender<bool>,
) {
    while let Some(item) = rx.recv().await {
        match item {
            Outbound::Response(response) => {
                if let Err(e) = sender.send(response).await {
                    warn!("write failed, dropping connection: {}", e);
                    let _ = failed.send(true);
                    break;
                }
            }
            Outbound::Close => break,
        }
    }
    if let Err(e) = sender.close().await {
        debug!("close failed: {}", e);
    }
}
