//! # Ten
//!
//! Client for Ten, a two-player turn-based board game. Players take turns
//! claiming one to `max_move` slots of a shared board; whoever fills the
//! last slot loses.
//!
//! The server is authoritative. This client mirrors the game from the
//! server's messages, publishes snapshots for a UI to render, and sends the
//! local player's name and moves.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ten::prelude::*;
//!
//! # async fn run() -> Result<(), TenError> {
//! let client = TenClient::builder()
//!     .addr("localhost:9797")
//!     .player_name("Bo")
//!     .connect()
//!     .await?;
//!
//! let mut snapshots = client.subscribe();
//! while snapshots.changed().await.is_ok() {
//!     if client.is_my_turn() {
//!         client.send_player_move(1).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! - [`transport`]: the [`Connection`](transport::Connection) trait and
//!   stream connections
//! - [`protocol`]: frame codec and message catalog
//! - [`game`]: the game state machine
//! - [`session`]: read loop, dispatch and snapshot publication

mod client;
mod error;

pub use client::{ClientConfig, TenClient, TenClientBuilder, DEFAULT_ADDR};
pub use error::TenError;

pub use ten_game as game;
pub use ten_protocol as protocol;
pub use ten_session as session;
pub use ten_transport as transport;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a `fmt` subscriber on stderr, filtered by `RUST_LOG`
/// (default `info`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

pub mod prelude {
    pub use crate::{init_tracing, ClientConfig, TenClient, TenError};
    pub use ten_game::{GameConfig, GameData, Phase};
    pub use ten_protocol::PlayerId;
    pub use ten_session::{LinkState, SessionSnapshot};
    pub use ten_transport::{Connection, StreamConnection, TcpConnection};
}
