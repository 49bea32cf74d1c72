use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::config::{ServerConfig, DEFAULT_IO_TIMEOUT, DEFAULT_MAX_FRAME_SIZE};
use crate::transport::{FrameReceiver, FrameSender, Transport};

/// Limits applied to a framed TCP connection.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimits {
    /// Timeout for a write, or for reading the body of a frame once its
    /// length prefix arrived.
    pub io_timeout: Duration,
    pub max_frame_size: u32,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            io_timeout: DEFAULT_IO_TIMEOUT,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl From<&ServerConfig> for FrameLimits {
    fn from(cfg: &ServerConfig) -> Self {
        Self {
            io_timeout: cfg.io_timeout,
            max_frame_size: cfg.max_frame_size,
        }
    }
}

/// Length-prefixed bincode frames over a TCP stream.
pub struct TcpTransport {
    stream: TcpStream,
    limits: FrameLimits,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_limits(stream, FrameLimits::default())
    }

    pub fn with_limits(stream: TcpStream, limits: FrameLimits) -> Self {
        Self { stream, limits }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }
}

impl<In, Out> Transport<In, Out> for TcpTransport
where
    In: DeserializeOwned + Send + 'static,
    Out: Serialize + Send + 'static,
{
    type Receiver = TcpReceiver<In>;
    type Sender = TcpSender<Out>;

    fn split(self) -> (Self::Receiver, Self::Sender) {
        let (read, write) = self.stream.into_split();
        (
            TcpReceiver {
                read,
                limits: self.limits,
                _marker: PhantomData,
            },
            TcpSender {
                write: Some(write),
                limits: self.limits,
                _marker: PhantomData,
            },
        )
    }
}

pub struct TcpReceiver<T> {
    read: OwnedReadHalf,
    limits: FrameLimits,
    _marker: PhantomData<fn() -> T>,
}

pub struct TcpSender<T> {
    write: Option<OwnedWriteHalf>,
    limits: FrameLimits,
    _marker: PhantomData<fn(T)>,
}

fn read_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof => anyhow::anyhow!("Connection closed by peer"),
        std::io::ErrorKind::ConnectionReset => anyhow::anyhow!("Connection reset by peer"),
        _ => anyhow::anyhow!("Read error: {}", e),
    }
}

fn write_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset => {
            anyhow::anyhow!("Connection closed by peer")
        }
        _ => anyhow::anyhow!("Write error: {}", e),
    }
}

/// Encode one frame: 4-byte big-endian length followed by the bincode body.
pub fn encode_frame<T: Serialize>(msg: &T, max_frame_size: u32) -> anyhow::Result<Vec<u8>> {
    let data = bincode::serialize(msg).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
    if data.len() as u64 > max_frame_size as u64 {
        return Err(anyhow::anyhow!(
            "Message too large: {} bytes (max: {})",
            data.len(),
            max_frame_size
        ));
    }
    let mut frame = Vec::with_capacity(4 + data.len());
    frame.extend_from_slice(&(data.len() as u32).to_be_bytes());
    frame.extend_from_slice(&data);
    Ok(frame)
}

async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, frame: &[u8]) -> anyhow::Result<()> {
    writer.write_all(frame).await.map_err(write_error)?;
    writer.flush().await.map_err(write_error)
}

/// Read one frame produced by [`encode_frame`].
///
/// Waiting for the length prefix is unbounded: a silent peer is not a dead
/// one. The body must follow within `limits.io_timeout`.
pub async fn read_frame<R, T>(reader: &mut R, limits: &FrameLimits) -> anyhow::Result<T>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await.map_err(read_error)?;

    let len = u32::from_be_bytes(len_buf);
    if len > limits.max_frame_size {
        return Err(anyhow::anyhow!(
            "Message too large: {} bytes (max: {})",
            len,
            limits.max_frame_size
        ));
    }
    if len == 0 {
        return Err(anyhow::anyhow!("Invalid message length: 0"));
    }

    let mut buf = vec![0u8; len as usize];
    timeout(limits.io_timeout, reader.read_exact(&mut buf))
        .await
        .map_err(|_| anyhow::anyhow!("Receive timeout after {:?}", limits.io_timeout))?
        .map_err(read_error)?;

    bincode::deserialize(&buf).map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))
}

#[async_trait::async_trait]
impl<T> FrameReceiver<T> for TcpReceiver<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn recv(&mut self) -> anyhow::Result<T> {
        read_frame(&mut self.read, &self.limits).await
    }
}

#[async_trait::async_trait]
impl<T> FrameSender<T> for TcpSender<T>
where
    T: Serialize + Send + 'static,
{
    async fn send(&mut self, msg: T) -> anyhow::Result<()> {
        let write = self
            .write
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Transport is shut down"))?;
        let frame = encode_frame(&msg, self.limits.max_frame_size)?;
        timeout(self.limits.io_timeout, write_frame(write, &frame))
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", self.limits.io_timeout))?
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        if let Some(mut write) = self.write.take() {
            write.shutdown().await.map_err(write_error)?;
        }
        Ok(())
    }
}
