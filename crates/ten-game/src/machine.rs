//! The transition function.
//!
//! Each `(phase, event)` pair maps to exactly one private handler below. The
//! match in [`GameData::apply`] is exhaustive, so adding a phase or an event
//! without deciding what it does is a compile error.

use ten_protocol::PlayerId;

use crate::{GameData, Phase};

/// An inbound game message, already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A player joined, or (after the game ends) voted to restart.
    AddPlayer { player_id: PlayerId, name: String },

    /// A player claimed `amount` slots.
    MovePlayer { player_id: PlayerId, amount: u8 },

    /// The server named the starting player.
    SetActivePlayer { player_id: PlayerId },
}

/// Why an event left the game unchanged.
///
/// None of these are errors. Stale, duplicate or out-of-turn messages are
/// expected and simply don't apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// A join arrived after the roster filled.
    RosterLocked,

    /// A move from someone other than the active player.
    NotActivePlayer {
        player_id: PlayerId,
        active_player: PlayerId,
    },

    /// A move of zero or more than `max_move` slots.
    MoveOutOfRange { amount: u8, max_move: u8 },

    /// A restart vote from a player who isn't in the roster.
    UnknownVoter { player_id: PlayerId },

    /// A repeated restart vote.
    AlreadyVoted { player_id: PlayerId },

    /// The event has no meaning in the current phase.
    WrongPhase { phase: Phase },
}

impl std::fmt::Display for Ignored {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RosterLocked => write!(f, "roster is locked"),
            Self::NotActivePlayer {
                player_id,
                active_player,
            } => write!(f, "{player_id} moved out of turn (active: {active_player})"),
            Self::MoveOutOfRange { amount, max_move } => {
                write!(f, "move of {amount} outside 1..={max_move}")
            }
            Self::UnknownVoter { player_id } => {
                write!(f, "restart vote from unknown player {player_id}")
            }
            Self::AlreadyVoted { player_id } => {
                write!(f, "{player_id} already voted to restart")
            }
            Self::WrongPhase { phase } => write!(f, "not applicable in {phase}"),
        }
    }
}

/// The outcome of applying an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The event was accepted. Holds the complete next record.
    Applied(GameData),
    /// The event was dropped; the current record stands.
    Ignored(Ignored),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Returns the next record, if the event was accepted.
    pub fn applied(self) -> Option<GameData> {
        match self {
            Self::Applied(game) => Some(game),
            Self::Ignored(_) => None,
        }
    }
}

impl GameData {
    /// Applies an event, returning the next record or why nothing changed.
    ///
    /// `self` is never modified. Callers swap in the returned record whole,
    /// so an observer can't see a half-applied move.
    pub fn apply(&self, event: &Event) -> Transition {
        match (self.phase, event) {
            (Phase::WaitingForPlayers, Event::AddPlayer { player_id, name }) => {
                self.join(*player_id, name)
            }
            (Phase::WaitingForPlayers, Event::SetActivePlayer { player_id }) => {
                self.set_active(*player_id)
            }
            (Phase::WaitingOnMove, Event::AddPlayer { .. }) => {
                Transition::Ignored(Ignored::RosterLocked)
            }
            (Phase::WaitingOnMove, Event::MovePlayer { player_id, amount }) => {
                self.take_move(*player_id, *amount)
            }
            (Phase::GameOver, Event::AddPlayer { player_id, .. }) => {
                self.vote_restart(*player_id)
            }
            (
                phase @ (Phase::WaitingForPlayers | Phase::GameOver),
                Event::MovePlayer { .. },
            )
            | (phase @ (Phase::WaitingOnMove | Phase::GameOver), Event::SetActivePlayer { .. }) => {
                Transition::Ignored(Ignored::WrongPhase { phase })
            }
        }
    }

    fn join(&self, player_id: PlayerId, name: &str) -> Transition {
        let mut next = self.clone();
        // A join that finds the roster already full still locks it.
        if !next.is_roster_full() {
            next.player_ids.push(player_id);
            next.player_names.push(name.to_string());
        }
        if next.is_roster_full() {
            next.phase = Phase::WaitingOnMove;
        }
        Transition::Applied(next)
    }

    fn set_active(&self, player_id: PlayerId) -> Transition {
        // Membership isn't enforced before play begins.
        let known = self.contains_player(player_id);
        tracing::debug!(%player_id, known, "setting active player");

        let mut next = self.clone();
        next.active_player = player_id;
        Transition::Applied(next)
    }

    fn take_move(&self, player_id: PlayerId, amount: u8) -> Transition {
        if player_id != self.active_player {
            return Transition::Ignored(Ignored::NotActivePlayer {
                player_id,
                active_player: self.active_player,
            });
        }
        let max_move = self.config.max_move;
        if amount == 0 || amount > max_move {
            return Transition::Ignored(Ignored::MoveOutOfRange { amount, max_move });
        }

        let mut next = self.clone();
        let claimed = usize::from(amount).min(next.remaining());
        next.board.extend(std::iter::repeat_n(player_id, claimed));

        if next.board.len() >= usize::from(next.config.board_size) {
            // The mover filled the board and stays active as the loser.
            next.phase = Phase::GameOver;
            return Transition::Applied(next);
        }

        if let Some(index) = next.player_ids.iter().position(|id| *id == player_id) {
            let following = (index + 1) % next.player_ids.len();
            next.active_player = next.player_ids[following];
        }
        Transition::Applied(next)
    }

    fn vote_restart(&self, player_id: PlayerId) -> Transition {
        if !self.contains_player(player_id) {
            return Transition::Ignored(Ignored::UnknownVoter { player_id });
        }
        if self.restart_ids.contains(&player_id) {
            return Transition::Ignored(Ignored::AlreadyVoted { player_id });
        }

        let mut next = self.clone();
        next.restart_ids.insert(player_id);

        let unanimous = next
            .player_ids
            .iter()
            .all(|id| next.restart_ids.contains(id));
        if unanimous {
            // active_player carries over: the previous loser opens.
            next.restart_ids.clear();
            next.board.clear();
            next.phase = Phase::WaitingOnMove;
        }
        Transition::Applied(next)
    }
}
