//! Error types for the session layer.

use ten_protocol::ProtocolError;

/// Errors returned by outbound session operations.
///
/// Inbound problems never surface here: malformed or unexpected frames are
/// logged and dropped, and a failed read ends the session, which shows up
/// as [`LinkState::Disconnected`](crate::LinkState::Disconnected) in the
/// published snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The message could not be encoded. Nothing was written.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The connection refused the write.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The session has already disconnected.
    #[error("session is disconnected")]
    Disconnected,
}
