//! `TenClient` builder and client handle.
//!
//! This is the entry point for a Ten client. It ties the layers together:
//! transport → protocol → game → session.

use serde::{Deserialize, Serialize};
use ten_session::{SessionHandle, SessionSnapshot};
use ten_transport::{Connection, TcpConnection};
use tokio::sync::watch;

use crate::TenError;

/// The server endpoint used when none is configured.
pub const DEFAULT_ADDR: &str = "localhost:9797";

/// Settings for connecting a client.
///
/// Every field has a default, so a partial config file deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// `host:port` of the game server.
    pub addr: String,

    /// Sent as `UserName` when the session starts. Empty means no name is
    /// sent.
    pub player_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            player_name: String::new(),
        }
    }
}

/// Builder for configuring and starting a client.
///
/// # Example
///
/// ```rust,ignore
/// let client = TenClient::builder()
///     .addr("game.example.com:9797")
///     .player_name("Bo")
///     .connect()
///     .await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TenClientBuilder {
    config: ClientConfig,
}

impl TenClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server address.
    pub fn addr(mut self, addr: &str) -> Self {
        self.config.addr = addr.to_string();
        self
    }

    /// Sets the name announced to the server.
    pub fn player_name(mut self, name: &str) -> Self {
        self.config.player_name = name.to_string();
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Opens a TCP connection to the configured address and starts the
    /// session.
    pub async fn connect(self) -> Result<TenClient<TcpConnection>, TenError> {
        let conn = TcpConnection::connect(&self.config.addr).await?;
        self.start(conn).await
    }

    /// Starts a session on an already established connection, such as a
    /// TLS-wrapped stream.
    ///
    /// Sends the player name first, if one is configured.
    pub async fn start<C: Connection>(self, conn: C) -> Result<TenClient<C>, TenError> {
        let session = SessionHandle::start(conn);
        let client = TenClient {
            session,
            config: self.config,
        };

        if !client.config.player_name.is_empty() {
            if let Err(e) = client.session.send_user_name(&client.config.player_name).await {
                client.session.shutdown().await;
                return Err(e.into());
            }
            tracing::info!(name = %client.config.player_name, "announced player name");
        }
        Ok(client)
    }
}

/// A connected Ten client.
///
/// Wraps a [`SessionHandle`]; clone the session via
/// [`session()`](Self::session) to share it between tasks.
pub struct TenClient<C: Connection> {
    session: SessionHandle<C>,
    config: ClientConfig,
}

impl TenClient<TcpConnection> {
    /// Creates a new builder.
    pub fn builder() -> TenClientBuilder {
        TenClientBuilder::new()
    }
}

impl<C: Connection> TenClient<C> {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying session handle.
    pub fn session(&self) -> &SessionHandle<C> {
        &self.session
    }

    /// Sends a move attempt of `amount` slots.
    pub async fn send_player_move(&self, amount: u8) -> Result<(), TenError> {
        self.session.send_player_move(amount).await?;
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.session.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn is_my_turn(&self) -> bool {
        self.session.is_my_turn()
    }

    /// Waits for the connection to end.
    pub async fn closed(&self) -> SessionSnapshot {
        self.session.closed().await
    }

    pub async fn shutdown(&self) {
        self.session.shutdown().await;
    }
}
