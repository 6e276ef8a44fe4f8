//! Rule engine and turn sequencing.
//!
//! Validates placement, selection, movement and construction commands,
//! applies them to the board, and tracks phase, turn, and winner.

pub mod error;
pub mod event;
pub mod phase;
pub mod player;
pub mod rules;

pub use error::ActionError;
pub use event::GameEvent;
pub use phase::Phase;
pub use player::{Player, PlayerKind};
pub use rules::{Game, BUILDERS_PER_PLAYER};
