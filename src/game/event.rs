//! Notifications for the presentation layer.
//!
//! The engine queues an event for every phase change, turn rotation and game
//! end. Front ends drain the queue after each command to redraw, swap cursors
//! or play sounds.

use super::phase::Phase;
use crate::board::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PhaseChanged { from: Phase, to: Phase },
    TurnRotated { to: PlayerId },
    GameOver { winner: PlayerId },
}
