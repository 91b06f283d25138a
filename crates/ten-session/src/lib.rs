//! Client session controller for Ten.
//!
//! A session owns one live connection to the server and keeps the local
//! mirror of the game current:
//!
//! 1. **Read loop**: inbound bytes go through the frame decoder, one read
//!    outstanding at a time, until the stream closes or fails.
//! 2. **Dispatch** ([`SessionController`]): each message either sets the
//!    local player id, replaces the game, or becomes a state machine event.
//! 3. **Publication** ([`SessionHandle::subscribe`]): every accepted change
//!    publishes a complete [`SessionSnapshot`] on a `watch` channel.
//! 4. **Outbound** ([`SessionHandle::send_user_name`],
//!    [`SessionHandle::send_player_move`]): encode and write, no
//!    acknowledgement.
//!
//! # How it fits in the stack
//!
//! ```text
//! Application / UI (above)  ← watches snapshots, sends moves
//!     ↕
//! Session Layer (this crate)  ← read loop, dispatch, publication
//!     ↕
//! Game + Protocol Layers (below)  ← state machine, frame codec, catalog
//!     ↕
//! Transport Layer  ← raw bytes
//! ```

mod controller;
mod error;
mod handle;

pub use controller::{LinkState, SessionController, SessionSnapshot};
pub use error::SessionError;
pub use handle::SessionHandle;
