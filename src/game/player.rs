//! Players and who drives them.

use serde::{Deserialize, Serialize};

use crate::board::PlayerId;

/// Where a player's actions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerKind {
    /// Local input.
    Human,
    /// A local strategy submitting moves through the same commands as a human.
    Ai,
    /// The peer at the other end of a network session.
    Remote,
}

/// A seat at the table with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub kind: PlayerKind,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, kind: PlayerKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    /// A local human player named after the seat number.
    pub fn human(id: PlayerId) -> Self {
        Self::new(id, format!("Player {}", id.number()), PlayerKind::Human)
    }
}
