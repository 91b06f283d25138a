//! The message catalog: per-opcode payload layouts.
//!
//! [`ServerMessage`] covers what the server sends, [`ClientMessage`] what
//! the client sends. Both directions can be parsed and encoded so the same
//! catalog serves a client, a server, or a test peer.
//!
//! | Opcode            | Payload                                   |
//! |-------------------|-------------------------------------------|
//! | `UserName`        | UTF-8 name                                |
//! | `PlayerMove`      | `[0]` move amount                         |
//! | `ServerWelcome`   | `[0]` assigned player id                  |
//! | `AddPlayer`       | `[0]` player id, `[1..]` UTF-8 name        |
//! | `SetActivePlayer` | `[0]` player id                           |
//! | `GameData`        | `[0]` max players, `[1]` max move, `[2]` board size |
//! | `MovePlayer`      | `[0]` player id, `[1]` move amount        |
//! | `RestartGame`     | reserved, empty                           |
//! | `EndGame`         | reserved, empty                           |
//!
//! Bytes past the end of a fixed layout are ignored. Names that aren't
//! valid UTF-8 decode lossily rather than failing.

use crate::{encode, Message, Opcode, PlayerId, ProtocolError};

/// Returns the payload if it holds at least `needed` bytes.
fn require(message: &Message, needed: usize) -> Result<&[u8], ProtocolError> {
    if message.payload.len() < needed {
        return Err(ProtocolError::Truncated {
            opcode: message.opcode,
            needed,
            actual: message.payload.len(),
        });
    }
    Ok(&message.payload)
}

fn lossy_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// ---------------------------------------------------------------------------
// ServerMessage
// ---------------------------------------------------------------------------

/// Messages the server sends to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Assigns the receiving client its player id.
    Welcome { player_id: PlayerId },

    /// Starts a fresh game with these limits.
    GameData {
        max_players: u8,
        max_move: u8,
        board_size: u8,
    },

    /// A player joined. After the game ends, the same message is a
    /// restart vote from that player.
    AddPlayer { player_id: PlayerId, name: String },

    /// Names the player whose turn it is (before moves begin).
    SetActivePlayer { player_id: PlayerId },

    /// A player claimed `amount` board slots.
    MovePlayer { player_id: PlayerId, amount: u8 },

    /// Reserved.
    RestartGame,

    /// Reserved.
    EndGame,
}

impl ServerMessage {
    /// The opcode this message travels under.
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Welcome { .. } => Opcode::ServerWelcome,
            Self::GameData { .. } => Opcode::GameData,
            Self::AddPlayer { .. } => Opcode::AddPlayer,
            Self::SetActivePlayer { .. } => Opcode::SetActivePlayer,
            Self::MovePlayer { .. } => Opcode::MovePlayer,
            Self::RestartGame => Opcode::RestartGame,
            Self::EndGame => Opcode::EndGame,
        }
    }

    /// Interprets a decoded frame as a server message.
    ///
    /// # Errors
    /// - [`ProtocolError::Truncated`] if the payload is shorter than the
    ///   opcode's layout.
    /// - [`ProtocolError::UnexpectedOpcode`] for client-only opcodes and
    ///   `Unknown`.
    pub fn parse(message: &Message) -> Result<Self, ProtocolError> {
        match message.opcode {
            Opcode::ServerWelcome => {
                let p = require(message, 1)?;
                Ok(Self::Welcome {
                    player_id: PlayerId(p[0]),
                })
            }
            Opcode::GameData => {
                let p = require(message, 3)?;
                Ok(Self::GameData {
                    max_players: p[0],
                    max_move: p[1],
                    board_size: p[2],
                })
            }
            Opcode::AddPlayer => {
                let p = require(message, 1)?;
                Ok(Self::AddPlayer {
                    player_id: PlayerId(p[0]),
                    name: lossy_name(&p[1..]),
                })
            }
            Opcode::SetActivePlayer => {
                let p = require(message, 1)?;
                Ok(Self::SetActivePlayer {
                    player_id: PlayerId(p[0]),
                })
            }
            Opcode::MovePlayer => {
                let p = require(message, 2)?;
                Ok(Self::MovePlayer {
                    player_id: PlayerId(p[0]),
                    amount: p[1],
                })
            }
            Opcode::RestartGame => Ok(Self::RestartGame),
            Opcode::EndGame => Ok(Self::EndGame),
            other @ (Opcode::UserName
            | Opcode::PlayerMove
            | Opcode::Unknown(_)) => Err(ProtocolError::UnexpectedOpcode(other)),
        }
    }

    /// The payload bytes for this message.
    pub fn to_payload(&self) -> Vec<u8> {
        match self {
            Self::Welcome { player_id } | Self::SetActivePlayer { player_id } => {
                vec![player_id.0]
            }
            Self::GameData {
                max_players,
                max_move,
                board_size,
            } => vec![*max_players, *max_move, *board_size],
            Self::AddPlayer { player_id, name } => {
                let mut payload = Vec::with_capacity(1 + name.len());
                payload.push(player_id.0);
                payload.extend_from_slice(name.as_bytes());
                payload
            }
            Self::MovePlayer { player_id, amount } => vec![player_id.0, *amount],
            Self::RestartGame | Self::EndGame => Vec::new(),
        }
    }

    /// Encodes the full frame.
    ///
    /// # Errors
    /// [`ProtocolError::PayloadTooLarge`] if an `AddPlayer` name is longer
    /// than 254 bytes.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self.opcode(), &self.to_payload())
    }
}

// ---------------------------------------------------------------------------
// ClientMessage
// ---------------------------------------------------------------------------

/// Messages a client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// The player's display name, sent once on session start.
    UserName(String),

    /// A move attempt of `amount` slots.
    PlayerMove { amount: u8 },
}

impl ClientMessage {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::UserName(_) => Opcode::UserName,
            Self::PlayerMove { .. } => Opcode::PlayerMove,
        }
    }

    /// Interprets a decoded frame as a client message.
    ///
    /// # Errors
    /// - [`ProtocolError::Truncated`] for an empty `PlayerMove`.
    /// - [`ProtocolError::UnexpectedOpcode`] for anything else.
    pub fn parse(message: &Message) -> Result<Self, ProtocolError> {
        match message.opcode {
            Opcode::UserName => Ok(Self::UserName(lossy_name(&message.payload))),
            Opcode::PlayerMove => {
                let p = require(message, 1)?;
                Ok(Self::PlayerMove { amount: p[0] })
            }
            other => Err(ProtocolError::UnexpectedOpcode(other)),
        }
    }

    pub fn to_payload(&self) -> Vec<u8> {
        match self {
            Self::UserName(name) => name.as_bytes().to_vec(),
            Self::PlayerMove { amount } => vec![*amount],
        }
    }

    /// Encodes the full frame.
    ///
    /// # Errors
    /// [`ProtocolError::PayloadTooLarge`] if the name is longer than 255
    /// bytes.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self.opcode(), &self.to_payload())
    }
}
