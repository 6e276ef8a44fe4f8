//! The 5x5 building grid.
//!
//! Holds building levels and builder positions and answers the geometric
//! questions the rules need (who can step where, where a builder can build).
//! It knows nothing about turns or phases and trusts its caller to only ask
//! for legal one-step constructions.

use super::cell::{Cell, Level, PlayerId};
use super::position::{Position, BOARD_COLS, BOARD_ROWS, CELL_COUNT};

/// The eight (row, col) offsets around a square, in row-major order.
const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Complete board contents.
///
/// Uses a fixed-size array indexed by `Position::index` so the board is
/// trivially copyable. Equality compares every cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board with no buildings and no builders.
    pub const fn new() -> Self {
        Board {
            cells: [Cell::EMPTY; CELL_COUNT],
        }
    }

    /// Clears every cell back to the start-of-game state.
    pub fn reset(&mut self) {
        self.cells = [Cell::EMPTY; CELL_COUNT];
    }

    /// Returns the contents of a cell.
    pub fn cell_at(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    /// Returns the building level of a cell.
    pub fn level(&self, pos: Position) -> Level {
        self.cells[pos.index()].level
    }

    /// Returns the builder standing on a cell, if any.
    pub fn occupant(&self, pos: Position) -> Option<PlayerId> {
        self.cells[pos.index()].occupant
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.level(pos) == Level::Empty
    }

    pub fn is_level1(&self, pos: Position) -> bool {
        self.level(pos) == Level::Level1
    }

    pub fn is_level2(&self, pos: Position) -> bool {
        self.level(pos) == Level::Level2
    }

    pub fn is_level3(&self, pos: Position) -> bool {
        self.level(pos) == Level::Level3
    }

    pub fn is_dome(&self, pos: Position) -> bool {
        self.level(pos) == Level::Dome
    }

    /// Sets the building level of a cell, keeping its occupant.
    pub fn set_level(&mut self, pos: Position, level: Level) {
        self.cells[pos.index()].level = level;
    }

    pub fn add_level1(&mut self, pos: Position) {
        self.set_level(pos, Level::Level1);
    }

    pub fn add_level2(&mut self, pos: Position) {
        self.set_level(pos, Level::Level2);
    }

    pub fn add_level3(&mut self, pos: Position) {
        self.set_level(pos, Level::Level3);
    }

    pub fn add_dome(&mut self, pos: Position) {
        self.set_level(pos, Level::Dome);
    }

    /// Raises the building on a cell by one level.
    /// Returns false (and changes nothing) if the cell is already domed.
    pub fn upgrade(&mut self, pos: Position) -> bool {
        match self.level(pos).raised() {
            Some(level) => {
                self.set_level(pos, level);
                true
            }
            None => false,
        }
    }

    /// Lowers the building on a cell by one level, undoing an `upgrade`.
    /// Returns false (and changes nothing) on empty ground.
    pub fn downgrade(&mut self, pos: Position) -> bool {
        match self.level(pos).lowered() {
            Some(level) => {
                self.set_level(pos, level);
                true
            }
            None => false,
        }
    }

    /// True when a builder of `player` stands on the cell.
    pub fn is_occupied_by(&self, pos: Position, player: PlayerId) -> bool {
        self.occupant(pos) == Some(player)
    }

    /// True when no builder stands on the cell.
    pub fn is_free(&self, pos: Position) -> bool {
        self.cells[pos.index()].is_free()
    }

    /// Puts a builder on a cell, keeping its building level.
    pub fn place_occupant(&mut self, pos: Position, player: PlayerId) {
        self.cells[pos.index()].occupant = Some(player);
    }

    /// Takes the builder off a cell, keeping its building level.
    pub fn remove_occupant(&mut self, pos: Position) {
        self.cells[pos.index()].occupant = None;
    }

    /// True if a builder standing on `from` may step onto `pos`.
    ///
    /// The destination must be a free, undomed neighbour at most one level
    /// higher than the origin. Stepping down any number of levels is allowed.
    pub fn can_move_into(&self, pos: Position, from: Position) -> bool {
        self.is_free(pos)
            && pos.is_adjacent(from)
            && self.level(pos).height() <= self.level(from).height() + 1
            && !self.is_dome(pos)
    }

    /// True if a builder standing on `from` may build on `pos`.
    pub fn can_build_at(&self, pos: Position, from: Position) -> bool {
        pos.is_adjacent(from) && !self.is_dome(pos) && self.is_free(pos)
    }

    /// All on-board squares surrounding `pos`, in row-major order.
    pub fn neighbor_cells(&self, pos: Position) -> impl Iterator<Item = Position> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .filter_map(move |(dr, dc)| pos.offset(dr, dc))
    }

    /// Squares a builder on `pos` could move to.
    pub fn reachable_cells(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        self.neighbor_cells(pos)
            .filter(move |dest| self.can_move_into(*dest, pos))
    }

    /// Squares a builder on `pos` could build on.
    pub fn buildable_cells(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        self.neighbor_cells(pos)
            .filter(move |dest| self.can_build_at(*dest, pos))
    }

    /// Positions of every builder belonging to `player`, in row-major order.
    pub fn builders_of(&self, player: PlayerId) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(move |pos| self.is_occupied_by(*pos, player))
    }

    /// True if at least one of `player`'s builders can move.
    pub fn has_mobile_builder(&self, player: PlayerId) -> bool {
        self.builders_of(player)
            .any(|pos| self.reachable_cells(pos).next().is_some())
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..BOARD_ROWS {
            for col in 0..BOARD_COLS {
                let cell = self.cell_at(Position::new(row as u8, col as u8));
                let who = cell.occupant.map_or(0, PlayerId::number);
                write!(f, "| {} : {} ", who, cell.level.height())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cell::ALL_LEVELS;

    fn p(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn new_board_is_empty() {
        let board = Board::new();
        assert!(Position::all().all(|pos| board.is_empty(pos) && board.is_free(pos)));
    }

    #[test]
    fn upgrade_walks_every_level_then_stops() {
        let mut board = Board::new();
        let pos = p(2, 2);
        assert!(board.upgrade(pos));
        assert!(board.is_level1(pos));
        assert!(board.upgrade(pos));
        assert!(board.is_level2(pos));
        assert!(board.upgrade(pos));
        assert!(board.is_level3(pos));
        assert!(board.upgrade(pos));
        assert!(board.is_dome(pos));
        assert!(!board.upgrade(pos));
        assert!(board.is_dome(pos));
    }

    #[test]
    fn downgrade_undoes_upgrade() {
        let mut board = Board::new();
        board.add_level2(p(1, 1));
        let before = board;
        assert!(board.upgrade(p(1, 1)));
        assert!(board.downgrade(p(1, 1)));
        assert_eq!(board, before);
        assert!(!Board::new().downgrade(p(0, 0)));
    }

    #[test]
    fn levels_and_occupants_do_not_alias() {
        let mut board = Board::new();
        board.place_occupant(p(0, 0), PlayerId::Two);
        board.add_level3(p(0, 0));
        assert!(board.is_occupied_by(p(0, 0), PlayerId::Two));
        assert!(board.is_level3(p(0, 0)));
        board.remove_occupant(p(0, 0));
        assert!(board.is_free(p(0, 0)));
        assert!(board.is_level3(p(0, 0)));
    }

    #[test]
    fn cannot_climb_more_than_one_level() {
        for from in ALL_LEVELS {
            for to in ALL_LEVELS {
                let mut board = Board::new();
                board.set_level(p(2, 2), from);
                board.set_level(p(2, 3), to);
                let allowed = board.can_move_into(p(2, 3), p(2, 2));
                if to.height() > from.height() + 1 {
                    assert!(!allowed, "{:?} -> {:?} should be refused", from, to);
                }
                if to == Level::Dome {
                    assert!(!allowed);
                }
                if to != Level::Dome && to.height() <= from.height() + 1 {
                    assert!(allowed, "{:?} -> {:?} should be allowed", from, to);
                }
            }
        }
    }

    #[test]
    fn dome_blocks_movement_and_building() {
        let mut board = Board::new();
        board.add_dome(p(1, 1));
        for from in board.neighbor_cells(p(1, 1)).collect::<Vec<_>>() {
            board.set_level(from, Level::Level3);
            assert!(!board.can_move_into(p(1, 1), from));
            assert!(!board.can_build_at(p(1, 1), from));
        }
    }

    #[test]
    fn occupied_cell_blocks_movement_and_building() {
        let mut board = Board::new();
        board.place_occupant(p(0, 1), PlayerId::One);
        assert!(!board.can_move_into(p(0, 1), p(0, 0)));
        assert!(!board.can_build_at(p(0, 1), p(0, 0)));
    }

    #[test]
    fn non_adjacent_cells_are_never_reachable() {
        let board = Board::new();
        assert!(!board.can_move_into(p(2, 2), p(0, 0)));
        assert!(!board.can_build_at(p(2, 2), p(2, 2)));
    }

    #[test]
    fn neighbor_cells_are_row_major_and_clipped() {
        let board = Board::new();
        let corner: Vec<_> = board.neighbor_cells(p(0, 0)).collect();
        assert_eq!(corner, vec![p(0, 1), p(1, 0), p(1, 1)]);
        assert_eq!(board.neighbor_cells(p(2, 2)).count(), 8);
        assert_eq!(board.neighbor_cells(p(4, 2)).count(), 5);
    }

    #[test]
    fn reachable_cells_respect_heights_and_builders() {
        let mut board = Board::new();
        board.place_occupant(p(0, 0), PlayerId::One);
        board.place_occupant(p(0, 1), PlayerId::Two);
        board.add_level2(p(1, 0));
        let reachable: Vec<_> = board.reachable_cells(p(0, 0)).collect();
        assert_eq!(reachable, vec![p(1, 1)]);
        let buildable: Vec<_> = board.buildable_cells(p(0, 0)).collect();
        assert_eq!(buildable, vec![p(1, 0), p(1, 1)]);
    }

    #[test]
    fn builders_and_mobility() {
        let mut board = Board::new();
        board.place_occupant(p(0, 0), PlayerId::One);
        board.place_occupant(p(4, 4), PlayerId::One);
        board.place_occupant(p(2, 2), PlayerId::Two);
        let ones: Vec<_> = board.builders_of(PlayerId::One).collect();
        assert_eq!(ones, vec![p(0, 0), p(4, 4)]);
        assert!(board.has_mobile_builder(PlayerId::Two));

        for pos in board.neighbor_cells(p(2, 2)).collect::<Vec<_>>() {
            board.add_dome(pos);
        }
        assert!(!board.has_mobile_builder(PlayerId::Two));
    }

    #[test]
    fn copies_are_independent_and_compare_cellwise() {
        let mut board = Board::new();
        board.add_level1(p(3, 3));
        let mut copy = board;
        assert_eq!(copy, board);
        copy.upgrade(p(3, 3));
        assert_ne!(copy, board);
        assert!(board.is_level1(p(3, 3)));
    }

    #[test]
    fn reset_clears_everything() {
        let mut board = Board::new();
        board.add_dome(p(1, 2));
        board.place_occupant(p(3, 3), PlayerId::One);
        board.reset();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn display_renders_occupant_and_level() {
        let mut board = Board::new();
        board.place_occupant(p(0, 0), PlayerId::Two);
        board.add_level1(p(0, 0));
        let text = board.to_string();
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("| 2 : 1 | 0 : 0 "));
        assert_eq!(text.lines().count(), BOARD_ROWS);
    }
}
