//! The mirrored match record.

use std::collections::BTreeSet;

use serde::Serialize;
use ten_protocol::PlayerId;

use crate::{GameConfig, Phase};

/// The client's copy of a match.
///
/// A fresh record is built from every `GameData` message the server sends
/// and replaced wholesale by the next one. Fields are read through
/// accessors; the only way to change a record is
/// [`apply`](GameData::apply), which returns a new one.
///
/// Invariants held after every accepted transition:
///
/// - `player_names` and `player_ids` are index-aligned, in join order, and
///   never longer than `max_players`.
/// - `board` never holds more than `board_size` entries.
/// - `restart_ids` only holds rostered ids and is empty outside `GameOver`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameData {
    pub(crate) player_names: Vec<String>,
    pub(crate) player_ids: Vec<PlayerId>,
    pub(crate) restart_ids: BTreeSet<PlayerId>,
    pub(crate) board: Vec<PlayerId>,
    pub(crate) active_player: PlayerId,
    #[serde(flatten)]
    pub(crate) config: GameConfig,
    pub(crate) phase: Phase,
}

impl GameData {
    /// Creates an empty match waiting for players.
    ///
    /// The active player starts as `PlayerId(0)` until the server says
    /// otherwise.
    pub fn new(config: GameConfig) -> Self {
        Self {
            player_names: Vec::new(),
            player_ids: Vec::new(),
            restart_ids: BTreeSet::new(),
            board: Vec::with_capacity(usize::from(config.board_size)),
            active_player: PlayerId::default(),
            config,
            phase: Phase::WaitingForPlayers,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn max_players(&self) -> u8 {
        self.config.max_players
    }

    pub fn max_move(&self) -> u8 {
        self.config.max_move
    }

    pub fn board_size(&self) -> u8 {
        self.config.board_size
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Player ids in join order.
    pub fn player_ids(&self) -> &[PlayerId] {
        &self.player_ids
    }

    /// Player names, index-aligned with [`player_ids`](Self::player_ids).
    pub fn player_names(&self) -> &[String] {
        &self.player_names
    }

    /// Players who have voted to restart the finished game.
    pub fn restart_ids(&self) -> &BTreeSet<PlayerId> {
        &self.restart_ids
    }

    /// One entry per claimed slot, in claim order.
    pub fn board(&self) -> &[PlayerId] {
        &self.board
    }

    pub fn active_player(&self) -> PlayerId {
        self.active_player
    }

    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    /// Returns `true` once every seat is taken.
    pub fn is_roster_full(&self) -> bool {
        self.player_ids.len() >= usize::from(self.config.max_players)
    }

    pub fn contains_player(&self, player_id: PlayerId) -> bool {
        self.player_ids.contains(&player_id)
    }

    /// Looks up a rostered player's name.
    pub fn player_name(&self, player_id: PlayerId) -> Option<&str> {
        self.player_ids
            .iter()
            .position(|id| *id == player_id)
            .and_then(|index| self.player_names.get(index))
            .map(String::as_str)
    }

    /// The active player's name, or `None` if the active id isn't rostered.
    pub fn active_player_name(&self) -> Option<&str> {
        self.player_name(self.active_player)
    }

    /// Returns `true` if moves are being taken and it's `player_id`'s turn.
    pub fn is_turn_of(&self, player_id: PlayerId) -> bool {
        self.phase.is_in_play() && self.active_player == player_id
    }

    /// The player who filled the board, while the game is over.
    pub fn loser(&self) -> Option<PlayerId> {
        self.is_game_over().then_some(self.active_player)
    }

    /// Free board slots.
    pub fn remaining(&self) -> usize {
        usize::from(self.config.board_size).saturating_sub(self.board.len())
    }

    /// The board as `board_size` slots, each occupied by a player or empty.
    pub fn cells(&self) -> Vec<Option<PlayerId>> {
        let mut cells: Vec<Option<PlayerId>> =
            self.board.iter().copied().map(Some).collect();
        cells.resize(usize::from(self.config.board_size), None);
        cells
    }
}
