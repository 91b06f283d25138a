//! Wire protocol for Ten.
//!
//! This crate defines the "language" the two peers speak:
//!
//! - **Types** ([`Opcode`], [`FrameHeader`], [`Message`], [`PlayerId`]):
//!   the frame structure on the wire.
//! - **Codec** ([`encode`], [`FrameDecoder`]): converting between frames
//!   and a contiguous byte stream.
//! - **Catalog** ([`ServerMessage`], [`ClientMessage`]): what each
//!   opcode's payload means.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and session (game
//! state). It doesn't know about connections or game rules.
//!
//! ```text
//! Transport (bytes) → FrameDecoder (Message) → catalog (ServerMessage) → Session
//! ```

mod catalog;
mod codec;
mod error;
mod types;

pub use catalog::{ClientMessage, ServerMessage};
pub use codec::{encode, FrameDecoder, Frames, MAX_PAYLOAD_LEN};
pub use error::ProtocolError;
pub use types::{FrameHeader, Message, Opcode, PlayerId};
