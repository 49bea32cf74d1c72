use tokio::sync::mpsc;

use crate::transport::{FrameReceiver, FrameSender, Transport};

/// One end of an in-process connection, receiving `In` and sending `Out`.
pub struct InMemoryTransport<In, Out> {
    rx: mpsc::UnboundedReceiver<In>,
    tx: mpsc::UnboundedSender<Out>,
}

impl<A, B> InMemoryTransport<A, B> {
    /// Two connected ends: what one sends, the other receives.
    pub fn pair() -> (InMemoryTransport<A, B>, InMemoryTransport<B, A>) {
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, b_rx) = mpsc::unbounded_channel();
        (
            InMemoryTransport { rx: a_rx, tx: b_tx },
            InMemoryTransport { rx: b_rx, tx: a_tx },
        )
    }
}

pub struct InMemoryReceiver<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

pub struct InMemorySender<T> {
    tx: Option<mpsc::UnboundedSender<T>>,
}

impl<In, Out> Transport<In, Out> for InMemoryTransport<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    type Receiver = InMemoryReceiver<In>;
    type Sender = InMemorySender<Out>;

    fn split(self) -> (Self::Receiver, Self::Sender) {
        (
            InMemoryReceiver { rx: self.rx },
            InMemorySender { tx: Some(self.tx) },
        )
    }
}

#[async_trait::async_trait]
impl<T: Send + 'static> FrameReceiver<T> for InMemoryReceiver<T> {
    async fn recv(&mut self) -> anyhow::Result<T> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Channel closed"))
    }
}

#[async_trait::async_trait]
impl<T: Send + 'static> FrameSender<T> for InMemorySender<T> {
    async fn send(&mut self, msg: T) -> anyhow::Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Transport is shut down"))?;
        tx.send(msg)
            .map_err(|_| anyhow::anyhow!("Connection closed by peer"))
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        self.tx = None;
        Ok(())
    }
}
