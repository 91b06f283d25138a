//! Unified error type for the Ten client.

use ten_protocol::ProtocolError;
use ten_session::SessionError;
use ten_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impl, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TenError {
    /// Connecting, sending or receiving failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A message could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An outbound session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}
