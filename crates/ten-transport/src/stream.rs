//! Byte-stream transport over any tokio `AsyncRead + AsyncWrite`.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::{
    AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf,
};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::{Connection, ConnectionId, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Upper bound on the bytes returned by a single `recv`.
///
/// Large enough for a full frame (2-byte header + 255-byte payload).
pub const READ_CHUNK_SIZE: usize = 4096;

/// A connection backed by a plain TCP stream.
pub type TcpConnection = StreamConnection<TcpStream>;

/// A [`Connection`] over an already-established byte stream.
///
/// The stream is split into independently locked halves so an outbound
/// send never waits behind the pending read.
pub struct StreamConnection<S> {
    id: ConnectionId,
    reader: Mutex<ReadHalf<S>>,
    writer: Mutex<WriteHalf<S>>,
}

impl<S> StreamConnection<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    /// Wraps an established stream (plain or TLS).
    pub fn new(stream: S) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        let id = ConnectionId::new(
            NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
        );
        tracing::debug!(%id, "stream connection opened");
        Self {
            id,
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
        }
    }
}

impl StreamConnection<TcpStream> {
    /// Opens a TCP connection to `addr`.
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(TransportError::ConnectFailed)?;
        stream.set_nodelay(true).map_err(TransportError::ConnectFailed)?;
        tracing::info!(addr, "connected");
        Ok(Self::new(stream))
    }
}

impl<S> Connection for StreamConnection<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let mut writer = self.writer.lock().await;
        writer
            .write_all(data)
            .await
            .map_err(TransportError::SendFailed)?;
        writer.flush().await.map_err(TransportError::SendFailed)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut buf = vec![0u8; READ_CHUNK_SIZE];
        let n = self
            .reader
            .lock()
            .await
            .read(&mut buf)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(buf))
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.writer
            .lock()
            .await
            .shutdown()
            .await
            .map_err(TransportError::SendFailed)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
