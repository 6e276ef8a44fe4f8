//! Board representation.
//!
//! Contains the cell contents (building level and occupant), grid
//! coordinates with their adjacency rule, and the board grid itself.

pub mod cell;
pub mod position;
pub mod state;

pub use cell::{Cell, Level, PlayerId, ALL_LEVELS};
pub use position::{Position, BOARD_COLS, BOARD_ROWS, CELL_COUNT};
pub use state::Board;
