//! Inbound dispatch, independent of any connection.
//!
//! [`SessionController`] turns raw inbound bytes into snapshot changes. It
//! performs no I/O, so the read loop in [`handle`](crate::SessionHandle)
//! and the tests drive exactly the same code.

use serde::Serialize;
use ten_game::{Event, GameConfig, GameData, Transition};
use ten_protocol::{FrameDecoder, Message, PlayerId, ProtocolError, ServerMessage};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Whether the session's connection is still usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LinkState {
    #[default]
    Connected,
    /// The read loop ended. No further snapshots will be published.
    Disconnected { reason: String },
}

impl LinkState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Everything an observer needs to render the session.
///
/// Snapshots are published whole, so an observer either sees the state
/// before a message or after it, never in between.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Set once by the server's welcome.
    pub player_id: Option<PlayerId>,
    /// `None` until the server sends `GameData`.
    pub game: Option<GameData>,
    pub link: LinkState,
}

impl SessionSnapshot {
    /// Returns `true` if the local player may move now.
    pub fn is_my_turn(&self) -> bool {
        match (self.player_id, &self.game) {
            (Some(player_id), Some(game)) => game.is_turn_of(player_id),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionController
// ---------------------------------------------------------------------------

/// Frame decoder plus the current snapshot.
#[derive(Debug, Default)]
pub struct SessionController {
    decoder: FrameDecoder,
    snapshot: SessionSnapshot,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    /// Feeds one inbound chunk.
    ///
    /// `on_change` runs after each accepted change with the complete new
    /// snapshot. A chunk may hold several frames, a partial frame, or both;
    /// leftover bytes wait for the next chunk. Returns the number of
    /// changes.
    pub fn ingest(&mut self, bytes: &[u8], mut on_change: impl FnMut(&SessionSnapshot)) -> usize {
        let mut changes = 0;
        for message in self.decoder.decode(bytes) {
            if dispatch(&mut self.snapshot, &message) {
                changes += 1;
                on_change(&self.snapshot);
            }
        }
        changes
    }

    /// Dispatches one decoded message. Returns `true` if the snapshot
    /// changed.
    pub fn handle(&mut self, message: &Message) -> bool {
        dispatch(&mut self.snapshot, message)
    }

    /// Marks the link as closed. Only the first reason is kept.
    pub fn disconnect(&mut self, reason: impl Into<String>) -> bool {
        if !self.snapshot.link.is_connected() {
            return false;
        }
        self.snapshot.link = LinkState::Disconnected {
            reason: reason.into(),
        };
        true
    }
}

fn dispatch(snapshot: &mut SessionSnapshot, message: &Message) -> bool {
    let parsed = match ServerMessage::parse(message) {
        Ok(parsed) => parsed,
        Err(ProtocolError::UnexpectedOpcode(opcode)) => {
            tracing::debug!(%opcode, "dropping unexpected message");
            return false;
        }
        Err(e) => {
            tracing::warn!(error = %e, "dropping malformed frame");
            return false;
        }
    };

    match parsed {
        ServerMessage::Welcome { player_id } => welcome(snapshot, player_id),
        ServerMessage::GameData {
            max_players,
            max_move,
            board_size,
        } => {
            tracing::info!(max_players, max_move, board_size, "game created");
            snapshot.game = Some(GameData::new(GameConfig {
                max_players,
                max_move,
                board_size,
            }));
            true
        }
        ServerMessage::AddPlayer { player_id, name } => {
            apply_event(snapshot, Event::AddPlayer { player_id, name })
        }
        ServerMessage::SetActivePlayer { player_id } => {
            apply_event(snapshot, Event::SetActivePlayer { player_id })
        }
        ServerMessage::MovePlayer { player_id, amount } => {
            apply_event(snapshot, Event::MovePlayer { player_id, amount })
        }
        ServerMessage::RestartGame | ServerMessage::EndGame => {
            tracing::trace!(opcode = %message.opcode, "reserved message ignored");
            false
        }
    }
}

fn welcome(snapshot: &mut SessionSnapshot, player_id: PlayerId) -> bool {
    if let Some(assigned) = snapshot.player_id {
        tracing::warn!(%assigned, %player_id, "ignoring repeated welcome");
        return false;
    }
    tracing::info!(%player_id, "welcomed by server");
    snapshot.player_id = Some(player_id);
    true
}

fn apply_event(snapshot: &mut SessionSnapshot, event: Event) -> bool {
    let Some(game) = &snapshot.game else {
        tracing::debug!(?event, "no game yet, dropping event");
        return false;
    };

    match game.apply(&event) {
        Transition::Applied(next) => {
            if !game.is_game_over() && next.is_game_over() {
                tracing::info!(loser = %next.active_player(), "game over");
            } else if game.is_game_over() && !next.is_game_over() {
                tracing::info!(active_player = %next.active_player(), "game restarted");
            }
            snapshot.game = Some(next);
            true
        }
        Transition::Ignored(reason) => {
            tracing::debug!(?event, %reason, "event ignored");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ten_game::Phase;
    use ten_protocol::{encode, Opcode};

    fn pid(id: u8) -> PlayerId {
        PlayerId(id)
    }

    fn frame(msg: ServerMessage) -> Vec<u8> {
        msg.encode().unwrap()
    }

    fn game_data() -> Vec<u8> {
        frame(ServerMessage::GameData {
            max_players: 2,
            max_move: 3,
            board_size: 10,
        })
    }

    fn add(id: u8, name: &str) -> Vec<u8> {
        frame(ServerMessage::AddPlayer {
            player_id: pid(id),
            name: name.into(),
        })
    }

    fn mv(id: u8, amount: u8) -> Vec<u8> {
        frame(ServerMessage::MovePlayer {
            player_id: pid(id),
            amount,
        })
    }

    fn feed(controller: &mut SessionController, bytes: &[u8]) -> usize {
        controller.ingest(bytes, |_| {})
    }

    fn started() -> SessionController {
        let mut controller = SessionController::new();
        let bytes = [
            frame(ServerMessage::Welcome { player_id: pid(0) }),
            game_data(),
            add(1, "Ann"),
            add(0, "Bo"),
        ]
        .concat();
        assert_eq!(feed(&mut controller, &bytes), 4);
        controller
    }

    // =====================================================================
    // Welcome and GameData
    // =====================================================================

    #[test]
    fn test_new_snapshot_is_empty_and_connected() {
        let controller = SessionController::new();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.player_id, None);
        assert!(snapshot.game.is_none());
        assert!(snapshot.link.is_connected());
        assert!(!snapshot.is_my_turn());
    }

    #[test]
    fn test_welcome_sets_player_id_once() {
        let mut controller = SessionController::new();
        let first = frame(ServerMessage::Welcome { player_id: pid(1) });
        let second = frame(ServerMessage::Welcome { player_id: pid(2) });

        assert_eq!(feed(&mut controller, &first), 1);
        assert_eq!(feed(&mut controller, &second), 0);
        assert_eq!(controller.snapshot().player_id, Some(pid(1)));
    }

    #[test]
    fn test_game_data_replaces_game_wholesale() {
        let mut controller = started();
        assert_eq!(
            controller.snapshot().game.as_ref().unwrap().player_ids().len(),
            2
        );

        let fresh = frame(ServerMessage::GameData {
            max_players: 3,
            max_move: 2,
            board_size: 12,
        });
        assert_eq!(feed(&mut controller, &fresh), 1);

        let game = controller.snapshot().game.as_ref().unwrap();
        assert!(game.player_ids().is_empty());
        assert_eq!(game.board_size(), 12);
        assert_eq!(game.phase(), Phase::WaitingForPlayers);
    }

    // =====================================================================
    // Game events
    // =====================================================================

    #[test]
    fn test_events_before_game_data_are_dropped() {
        let mut controller = SessionController::new();
        assert_eq!(feed(&mut controller, &add(1, "Ann")), 0);
        assert!(controller.snapshot().game.is_none());
    }

    #[test]
    fn test_moves_update_game_and_turn() {
        let mut controller = started();
        assert!(controller.snapshot().is_my_turn());

        assert_eq!(feed(&mut controller, &mv(0, 3)), 1);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.game.as_ref().unwrap().board().len(), 3);
        assert!(!snapshot.is_my_turn());
    }

    #[test]
    fn test_ignored_events_report_no_change() {
        let mut controller = started();
        let before = controller.snapshot().clone();

        assert_eq!(feed(&mut controller, &mv(1, 1)), 0);
        assert_eq!(feed(&mut controller, &mv(0, 9)), 0);
        assert_eq!(controller.snapshot(), &before);
    }

    #[test]
    fn test_set_active_player_before_roster_fills() {
        let mut controller = SessionController::new();
        let bytes = [
            game_data(),
            add(1, "Ann"),
            frame(ServerMessage::SetActivePlayer { player_id: pid(1) }),
        ]
        .concat();
        assert_eq!(feed(&mut controller, &bytes), 3);
        assert_eq!(
            controller.snapshot().game.as_ref().unwrap().active_player(),
            pid(1)
        );
    }

    #[test]
    fn test_on_change_sees_each_complete_snapshot() {
        let mut controller = SessionController::new();
        let bytes = [game_data(), add(1, "Ann"), add(0, "Bo")].concat();

        let mut seen = Vec::new();
        controller.ingest(&bytes, |snapshot| {
            let game = snapshot.game.as_ref().unwrap();
            seen.push((game.player_ids().len(), game.phase()));
        });

        assert_eq!(
            seen,
            vec![
                (0, Phase::WaitingForPlayers),
                (1, Phase::WaitingForPlayers),
                (2, Phase::WaitingOnMove),
            ]
        );
    }

    #[test]
    fn test_frames_split_across_chunks_apply_once_complete() {
        let mut controller = started();
        let bytes = mv(0, 2);

        assert_eq!(feed(&mut controller, &bytes[..1]), 0);
        assert_eq!(feed(&mut controller, &bytes[1..3]), 0);
        assert_eq!(feed(&mut controller, &bytes[3..]), 1);
        assert_eq!(controller.snapshot().game.as_ref().unwrap().board().len(), 2);
    }

    // =====================================================================
    // Dropped frames
    // =====================================================================

    #[test]
    fn test_malformed_frame_is_dropped() {
        let mut controller = started();
        let short_move = encode(Opcode::MovePlayer, &[0]).unwrap();
        assert_eq!(feed(&mut controller, &short_move), 0);

        // The stream stays in sync after the bad frame.
        assert_eq!(feed(&mut controller, &mv(0, 1)), 1);
    }

    #[test]
    fn test_unknown_and_client_opcodes_are_dropped() {
        let mut controller = started();
        let bytes = [
            vec![200, 1, 7],
            encode(Opcode::PlayerMove, &[1]).unwrap(),
            encode(Opcode::UserName, b"eve").unwrap(),
        ]
        .concat();
        assert_eq!(feed(&mut controller, &bytes), 0);
    }

    #[test]
    fn test_reserved_messages_are_dropped() {
        let mut controller = started();
        let bytes = [frame(ServerMessage::RestartGame), frame(ServerMessage::EndGame)].concat();
        assert_eq!(feed(&mut controller, &bytes), 0);
    }

    #[test]
    fn test_handle_dispatches_single_message() {
        let mut controller = SessionController::new();
        let msg = Message::new(Opcode::ServerWelcome, vec![3]);
        assert!(controller.handle(&msg));
        assert_eq!(controller.snapshot().player_id, Some(pid(3)));
    }

    // =====================================================================
    // Disconnect
    // =====================================================================

    #[test]
    fn test_disconnect_keeps_first_reason() {
        let mut controller = SessionController::new();
        assert!(controller.disconnect("peer closed"));
        assert!(!controller.disconnect("later"));
        assert_eq!(
            controller.snapshot().link,
            LinkState::Disconnected {
                reason: "peer closed".into()
            }
        );
    }

    #[test]
    fn test_snapshot_serializes_link_state() {
        let mut controller = started();
        controller.disconnect("bye");
        let json = serde_json::to_value(controller.snapshot()).unwrap();

        assert_eq!(json["player_id"], 0);
        assert_eq!(json["link"]["state"], "disconnected");
        assert_eq!(json["link"]["reason"], "bye");
        assert_eq!(json["game"]["phase"], "WaitingOnMove");
    }
}
