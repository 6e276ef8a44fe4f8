//! Rejections for illegal actions.

use super::phase::Phase;
use crate::board::{PlayerId, Position};

/// Why a command was refused. The game state is unchanged whenever one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("waiting for the other player")]
    Waiting,

    #[error("the game is over")]
    GameOver,

    #[error("not allowed during {actual} (expected {expected})")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("position {0} is off the board")]
    OutOfBounds(Position),

    #[error("position {0} is already occupied")]
    Occupied(Position),

    #[error("no builder of the current player at {0}")]
    NotOwnBuilder(Position),

    #[error("builder at {0} has no reachable cell")]
    Immobile(Position),

    #[error("cannot move from {from} to {to}")]
    Unreachable { from: Position, to: Position },

    #[error("cannot build on {to} from {from}")]
    NotBuildable { from: Position, to: Position },

    #[error("no builder selected")]
    NoSelection,

    #[error("{0} has more builders than allowed")]
    TooManyBuilders(PlayerId),
}
