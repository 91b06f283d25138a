//! Error types for the protocol layer.
//!
//! Only encoding can fail in a way the caller must handle. Decoding a frame
//! never fails (unknown opcodes are carried through as
//! [`Opcode::Unknown`]), and the payload errors below are reported to the
//! session, which logs and drops the frame.

use crate::Opcode;

/// Errors that can occur in the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The payload does not fit the one-byte length field.
    ///
    /// Raised before any bytes are produced, so nothing reaches the wire.
    #[error("payload of {len} bytes exceeds the 255-byte frame limit")]
    PayloadTooLarge { len: usize },

    /// Attempted to encode an opcode reserved for unrecognized input.
    #[error("opcode {0} is reserved and cannot be sent")]
    UnsendableOpcode(u8),

    /// The payload is shorter than its opcode's layout requires.
    #[error("{opcode} payload truncated: needed {needed} bytes, got {actual}")]
    Truncated {
        opcode: Opcode,
        needed: usize,
        actual: usize,
    },

    /// The opcode is valid on the wire but not in this direction
    /// (e.g. a client-only opcode arriving at the client).
    #[error("unexpected {0} message")]
    UnexpectedOpcode(Opcode),
}
