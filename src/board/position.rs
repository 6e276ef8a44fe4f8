//! Grid coordinates and the eight-neighbour adjacency rule.

use serde::{Deserialize, Serialize};

/// Number of rows on the board.
pub const BOARD_ROWS: usize = 5;

/// Number of columns on the board.
pub const BOARD_COLS: usize = 5;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = BOARD_ROWS * BOARD_COLS;

/// A (row, column) square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// True when the position lies on the board.
    pub const fn in_bounds(self) -> bool {
        (self.row as usize) < BOARD_ROWS && (self.col as usize) < BOARD_COLS
    }

    /// Row-major index into a flat cell array. Only valid for in-bounds positions.
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_COLS + self.col as usize
    }

    /// Inverse of [`Position::index`].
    pub const fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_COLS) as u8,
            col: (idx % BOARD_COLS) as u8,
        }
    }

    /// True when `other` is one of the eight squares surrounding `self`.
    ///
    /// Chebyshev distance exactly 1; a square is never adjacent to itself.
    pub fn is_adjacent(self, other: Position) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr < 2 && dc < 2 && dr + dc > 0
    }

    /// Offsets `self` by (dr, dc), returning `None` if the result leaves the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Position> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let pos = Position::new(row, col);
        pos.in_bounds().then_some(pos)
    }

    /// Iterates over every in-bounds square in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELL_COUNT).map(Position::from_index)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}
