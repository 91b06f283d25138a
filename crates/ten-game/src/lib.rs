//! Game state machine for Ten.
//!
//! A match is a [`GameData`] record moving through three phases:
//!
//! ```text
//! WaitingForPlayers → WaitingOnMove ⇄ GameOver
//! ```
//!
//! Every inbound game message becomes an [`Event`]. Applying it is a pure
//! function: [`GameData::apply`] never touches `self` and returns either the
//! next record or the reason the event was ignored. Illegal events (wrong
//! turn, out-of-range move, locked roster) are not errors; the game simply
//! doesn't change.
//!
//! # Key types
//!
//! - [`GameConfig`]: the three limits a match is created with
//! - [`Phase`]: where the match is in its lifecycle
//! - [`GameData`]: the mirrored match record
//! - [`Event`], [`Transition`], [`Ignored`]: the transition function's
//!   inputs and outputs

mod config;
mod data;
mod machine;

pub use config::{GameConfig, Phase};
pub use data::GameData;
pub use machine::{Event, Ignored, Transition};
