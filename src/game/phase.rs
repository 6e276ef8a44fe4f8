//! Turn phases.
//!
//! Phase flow:
//! - Placement    -> Selection (after all four builders are down)
//! - Selection    -> Movement
//! - Movement     -> Construction, or Finished on a climb to level 3
//! - Construction -> Selection for the other player, or Finished on stalemate
//! - Waiting      -> whichever phase was suspended
//! - Finished is absorbing.

use serde::{Deserialize, Serialize};

/// One state of the per-turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Local input is locked out while the peer or an AI is on turn.
    Waiting,
    /// Players are putting their two builders on the board.
    Placement,
    /// The current player picks which builder to use this turn.
    Selection,
    /// The selected builder must step to a reachable cell.
    Movement,
    /// The builder that just moved must build next to itself.
    Construction,
    /// Someone has won.
    Finished,
}

impl Phase {
    /// True for phases in which a command can change the board.
    pub const fn is_active(self) -> bool {
        matches!(
            self,
            Phase::Placement | Phase::Selection | Phase::Movement | Phase::Construction
        )
    }

    /// Lowercase name used in logs and the console front end.
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Waiting => "waiting",
            Phase::Placement => "placement",
            Phase::Selection => "selection",
            Phase::Movement => "movement",
            Phase::Construction => "construction",
            Phase::Finished => "finished",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_turn_phases_are_active() {
        assert!(Phase::Placement.is_active());
        assert!(Phase::Construction.is_active());
        assert!(!Phase::Waiting.is_active());
        assert!(!Phase::Finished.is_active());
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(Phase::Movement.to_string(), "movement");
    }
}
