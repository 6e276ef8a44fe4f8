//! Cell contents: building height and the builder standing on it.
//!
//! The two fields are orthogonal. Changing a building level never touches the
//! occupant and moving a builder never touches the level.

use serde::{Deserialize, Serialize};

/// Building height on a cell, from bare ground to a dome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Level {
    #[default]
    Empty = 0,
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
    Dome = 4,
}

/// All levels in ascending order.
pub const ALL_LEVELS: [Level; 5] = [
    Level::Empty,
    Level::Level1,
    Level::Level2,
    Level::Level3,
    Level::Dome,
];

impl Level {
    /// Returns the ordinal height (0 for empty ground, 4 for a dome).
    pub const fn height(self) -> u8 {
        self as u8
    }

    /// Converts an ordinal height back into a level.
    pub fn from_height(height: u8) -> Option<Level> {
        ALL_LEVELS.get(height as usize).copied()
    }

    /// The level one construction step above this one, or `None` on a dome.
    pub fn raised(self) -> Option<Level> {
        Level::from_height(self.height() + 1)
    }

    /// The level one step below this one, or `None` on empty ground.
    pub fn lowered(self) -> Option<Level> {
        self.height().checked_sub(1).and_then(Level::from_height)
    }
}

/// One of the two seats at the table. Doubles as the occupant tag of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// The other seat.
    pub const fn opponent(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Array index for per-player tables.
    pub const fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// Human-facing seat number (1 or 2).
    pub const fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.number())
    }
}

/// The contents of a single board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub level: Level,
    pub occupant: Option<PlayerId>,
}

impl Cell {
    /// An empty, unbuilt cell.
    pub const EMPTY: Cell = Cell {
        level: Level::Empty,
        occupant: None,
    };

    /// True when no builder stands on the cell.
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }
}
