//! Message transports. A connection is split into a receiving half, owned
//! by whichever task currently reads the player's input, and a sending half
//! owned by the connection's writer task.

use std::boxed::Box;

#[async_trait::async_trait]
pub trait FrameSender<T: Send + 'static>: Send {
    async fn send(&mut self, msg: T) -> anyhow::Result<()>;

    /// Close the sending direction; the peer sees end of stream.
    async fn close(&mut self) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait FrameReceiver<T: Send + 'static>: Send {
    async fn recv(&mut self) -> anyhow::Result<T>;
}

/// A bidirectional connection that receives `In` and sends `Out`.
pub trait Transport<In: Send + 'static, Out: Send + 'static> {
    type Receiver: FrameReceiver<In> + 'static;
    type Sender: FrameSender<Out> + 'static;

    fn split(self) -> (Self::Receiver, Self::Sender);
}

pub type BoxReceiver<T> = Box<dyn FrameReceiver<T>>;
pub type BoxSender<T> = Box<dyn FrameSender<T>>;

pub mod in_memory;
pub mod tcp;
