//! Game configuration and phase.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// The limits a match is created with.
///
/// On the client these arrive in the server's `GameData` message. All three
/// are single bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Players required before moves begin.
    pub max_players: u8,

    /// Largest number of slots a single move may claim.
    pub max_move: u8,

    /// Number of slots on the board. Filling the last one loses.
    pub board_size: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_players: 2,
            max_move: 3,
            board_size: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a match.
///
/// ```text
/// WaitingForPlayers → WaitingOnMove → GameOver → WaitingOnMove → ...
/// ```
///
/// - **WaitingForPlayers**: the roster is filling. The server may name the
///   starting player.
/// - **WaitingOnMove**: the roster is locked and the active player may move.
/// - **GameOver**: the board is full. `AddPlayer` messages now count as
///   restart votes; once everyone has voted, play resumes.
///
/// No phase is terminal. A match only ends when its connection does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    WaitingForPlayers,
    WaitingOnMove,
    GameOver,
}

impl Phase {
    /// Returns `true` while the roster is still open.
    pub fn accepts_players(&self) -> bool {
        matches!(self, Self::WaitingForPlayers)
    }

    /// Returns `true` while moves are being taken.
    pub fn is_in_play(&self) -> bool {
        matches!(self, Self::WaitingOnMove)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, Self::GameOver)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForPlayers => write!(f, "WaitingForPlayers"),
            Self::WaitingOnMove => write!(f, "WaitingOnMove"),
            Self::GameOver => write!(f, "GameOver"),
        }
    }
}
