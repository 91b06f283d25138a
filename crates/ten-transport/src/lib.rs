//! Transport abstraction layer for Ten.
//!
//! Provides the [`Connection`] trait: a single established, reliable,
//! ordered byte stream. The game protocol assumes nothing about message
//! boundaries here, so a `recv` may hand back half a frame or several
//! frames at once.
//!
//! [`StreamConnection`] adapts any tokio `AsyncRead + AsyncWrite` stream.
//! Plain TCP and TLS-wrapped TCP look the same from above this layer; the
//! TLS handshake happens before the stream is handed over.

mod error;
mod stream;

pub use error::TransportError;
pub use stream::{StreamConnection, TcpConnection, READ_CHUNK_SIZE};

use std::fmt;
use std::future::Future;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A single connection that can send and receive bytes.
///
/// The futures are `Send` so a connection can be driven from a spawned
/// task (the session read loop).
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Writes all of `data` to the remote peer.
    fn send(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receives the next chunk of bytes from the remote peer.
    ///
    /// Chunk boundaries carry no meaning. Returns `Ok(None)` when the
    /// connection is cleanly closed.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send;

    /// Closes the write side of the connection.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
