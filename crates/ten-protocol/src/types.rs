//! Core protocol types for Ten's wire format.
//!
//! Every frame on the wire is a 2-byte header followed by a payload:
//!
//! ```text
//! +------------+------------+------------------------+
//! | opcode (1) | length (1) | payload (length bytes) |
//! +------------+------------+------------------------+
//! ```
//!
//! The one-byte length field makes 255 bytes a hard payload ceiling.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player identifier as assigned by the server.
///
/// Newtype over the raw wire byte so a player id can't be confused with a
/// move amount or a board size, which are also single bytes on the wire.
///
/// `#[serde(transparent)]` serializes `PlayerId(1)` as plain `1`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
    Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

/// `tracing::info!(%player_id, "joined")` prints "P-1".
impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Opcode
// ---------------------------------------------------------------------------

/// The single-byte tag identifying a frame's message type.
///
/// The numeric values are fixed by the wire protocol. Any byte that doesn't
/// map to a known message decodes to `Unknown` carrying the raw byte, so a
/// peer speaking a newer protocol never breaks the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    UserName,
    PlayerMove,
    RestartGame,
    EndGame,
    GameData,
    AddPlayer,
    MovePlayer,
    SetActivePlayer,
    ServerWelcome,
    /// An unrecognized opcode byte.
    Unknown(u8),
}

impl Opcode {
    /// The canonical byte for an unknown opcode. Never sent.
    pub const UNKNOWN_BYTE: u8 = 255;

    /// Every opcode that may appear on the wire, in numeric order.
    pub const KNOWN: [Opcode; 9] = [
        Opcode::UserName,
        Opcode::PlayerMove,
        Opcode::RestartGame,
        Opcode::EndGame,
        Opcode::GameData,
        Opcode::AddPlayer,
        Opcode::MovePlayer,
        Opcode::SetActivePlayer,
        Opcode::ServerWelcome,
    ];

    /// Maps a raw byte to its opcode. Total: unmapped bytes become `Unknown`.
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            0 => Self::UserName,
            1 => Self::PlayerMove,
            2 => Self::RestartGame,
            3 => Self::EndGame,
            4 => Self::GameData,
            5 => Self::AddPlayer,
            6 => Self::MovePlayer,
            7 => Self::SetActivePlayer,
            8 => Self::ServerWelcome,
            other => Self::Unknown(other),
        }
    }

    /// Returns the wire byte for this opcode.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::UserName => 0,
            Self::PlayerMove => 1,
            Self::RestartGame => 2,
            Self::EndGame => 3,
            Self::GameData => 4,
            Self::AddPlayer => 5,
            Self::MovePlayer => 6,
            Self::SetActivePlayer => 7,
            Self::ServerWelcome => 8,
            Self::Unknown(byte) => byte,
        }
    }

    /// Returns `true` for every opcode except `Unknown`.
    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<u8> for Opcode {
    fn from(byte: u8) -> Self {
        Self::from_u8(byte)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserName => write!(f, "UserName"),
            Self::PlayerMove => write!(f, "PlayerMove"),
            Self::RestartGame => write!(f, "RestartGame"),
            Self::EndGame => write!(f, "EndGame"),
            Self::GameData => write!(f, "GameData"),
            Self::AddPlayer => write!(f, "AddPlayer"),
            Self::MovePlayer => write!(f, "MovePlayer"),
            Self::SetActivePlayer => write!(f, "SetActivePlayer"),
            Self::ServerWelcome => write!(f, "ServerWelcome"),
            Self::Unknown(byte) => write!(f, "Unknown({byte})"),
        }
    }
}

// ---------------------------------------------------------------------------
// FrameHeader
// ---------------------------------------------------------------------------

/// The fixed 2-byte frame header: opcode first, then payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub opcode: u8,
    pub length: u8,
}

impl FrameHeader {
    /// Size of an encoded header in bytes.
    pub const ENCODED_LEN: usize = 2;

    /// Returns the header bytes in wire order.
    pub fn to_bytes(self) -> [u8; Self::ENCODED_LEN] {
        [self.opcode, self.length]
    }

    /// Parses a header from its wire bytes.
    pub fn from_bytes(bytes: [u8; Self::ENCODED_LEN]) -> Self {
        Self {
            opcode: bytes[0],
            length: bytes[1],
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One decoded frame: its opcode and raw payload bytes.
///
/// The payload is uninterpreted here; the message catalog
/// ([`ServerMessage`](crate::ServerMessage),
/// [`ClientMessage`](crate::ClientMessage)) gives it meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub opcode: Opcode,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(opcode: Opcode, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            opcode,
            payload: payload.into(),
        }
    }
}
