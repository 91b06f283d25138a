//! The running session: read loop task plus outbound sends.

use std::sync::Arc;

use ten_protocol::ClientMessage;
use ten_transport::Connection;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::{LinkState, SessionController, SessionError, SessionSnapshot};

/// Aborts the read loop when the last handle clone is dropped.
///
/// The task holds its own `Arc` of the connection; aborting it releases the
/// socket.
struct ReaderGuard(AbortHandle);

impl Drop for ReaderGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Handle to a running session.
///
/// Cheap to clone; every clone talks to the same connection and watches the
/// same snapshots. The read loop runs until the connection closes, fails,
/// [`shutdown`](Self::shutdown) is called, or the last clone is dropped.
pub struct SessionHandle<C: Connection> {
    conn: Arc<C>,
    state: Arc<watch::Sender<SessionSnapshot>>,
    reader: Arc<ReaderGuard>,
}

impl<C: Connection> Clone for SessionHandle<C> {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            state: Arc::clone(&self.state),
            reader: Arc::clone(&self.reader),
        }
    }
}

impl<C: Connection> SessionHandle<C> {
    /// Takes ownership of an established connection and spawns its read
    /// loop. Must be called inside a tokio runtime.
    pub fn start(conn: C) -> Self {
        let conn = Arc::new(conn);
        let (state, _) = watch::channel(SessionSnapshot::default());
        let state = Arc::new(state);

        let task = tokio::spawn(read_loop(Arc::clone(&conn), Arc::clone(&state)));
        tracing::debug!(conn_id = %conn.id(), "session started");

        Self {
            conn,
            state,
            reader: Arc::new(ReaderGuard(task.abort_handle())),
        }
    }

    /// Sends the local player's name.
    ///
    /// # Errors
    /// - [`SessionError::Protocol`] if the name is longer than 255 bytes.
    /// - [`SessionError::Disconnected`] after the session has ended.
    /// - [`SessionError::Transport`] if the write fails.
    pub async fn send_user_name(&self, name: &str) -> Result<(), SessionError> {
        self.send(ClientMessage::UserName(name.to_string())).await
    }

    /// Sends a move attempt. The server decides whether it counts; the
    /// result shows up as a `MovePlayer` in a later snapshot.
    pub async fn send_player_move(&self, amount: u8) -> Result<(), SessionError> {
        self.send(ClientMessage::PlayerMove { amount }).await
    }

    async fn send(&self, message: ClientMessage) -> Result<(), SessionError> {
        let bytes = message.encode()?;
        if !self.state.borrow().link.is_connected() {
            return Err(SessionError::Disconnected);
        }
        self.conn
            .send(&bytes)
            .await
            .map_err(|e| SessionError::Transport(Box::new(e)))?;
        tracing::debug!(opcode = %message.opcode(), len = bytes.len(), "sent");
        Ok(())
    }

    /// Returns a receiver that sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// The latest snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn is_my_turn(&self) -> bool {
        self.state.borrow().is_my_turn()
    }

    /// Waits until the session is disconnected and returns the final
    /// snapshot.
    pub async fn closed(&self) -> SessionSnapshot {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|snapshot| !snapshot.link.is_connected()).await {
            Ok(snapshot) => snapshot.clone(),
            // Unreachable while `self` holds the sender.
            Err(_) => self.snapshot(),
        }
    }

    /// Stops the read loop, closes the connection and publishes the
    /// disconnect.
    pub async fn shutdown(&self) {
        self.reader.0.abort();
        if let Err(e) = self.conn.close().await {
            tracing::debug!(conn_id = %self.conn.id(), error = %e, "close failed");
        }
        self.state.send_if_modified(|snapshot| {
            if !snapshot.link.is_connected() {
                return false;
            }
            snapshot.link = LinkState::Disconnected {
                reason: "shut down".into(),
            };
            true
        });
        tracing::info!(conn_id = %self.conn.id(), "session shut down");
    }
}

/// Publishes a snapshot unless the session was already marked disconnected.
fn publish(state: &watch::Sender<SessionSnapshot>, next: &SessionSnapshot) {
    state.send_if_modified(|current| {
        if !current.link.is_connected() {
            return false;
        }
        *current = next.clone();
        true
    });
}

async fn read_loop<C: Connection>(conn: Arc<C>, state: Arc<watch::Sender<SessionSnapshot>>) {
    let conn_id = conn.id();
    let mut controller = SessionController::new();

    let reason = loop {
        match conn.recv().await {
            Ok(Some(bytes)) => {
                tracing::trace!(%conn_id, len = bytes.len(), "received");
                controller.ingest(&bytes, |snapshot| publish(&state, snapshot));
            }
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed by server");
                break "connection closed".to_string();
            }
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "receive failed");
                break e.to_string();
            }
        }
    };

    controller.disconnect(reason);
    publish(&state, controller.snapshot());
}
