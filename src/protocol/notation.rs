//! Compact text notation for board positions.
//!
//! Five rows separated by `/`, top row first. Each cell is its level digit
//! (`0`-`4`) optionally followed by `a` for a player-one builder or `b` for a
//! player-two builder. The empty board is `00000/00000/00000/00000/00000`.
//!
//! Example: `0a0a000/01000/00200/00030/0000b4` has player one on (0,0) and
//! (0,1), player two on (4,3), and a dome on (4,4).

use crate::board::{Board, Level, PlayerId, Position, BOARD_COLS, BOARD_ROWS};

/// Errors that can occur while parsing board notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("expected {BOARD_ROWS} rows separated by '/', got {0}")]
    WrongRowCount(usize),

    #[error("row {row} has {len} cells, expected {BOARD_COLS}")]
    WrongRowLength { row: usize, len: usize },

    #[error("invalid level character '{0}'")]
    InvalidLevel(char),

    #[error("builder standing on a dome at {0}")]
    BuilderOnDome(Position),
}

fn builder_char(player: PlayerId) -> char {
    match player {
        PlayerId::One => 'a',
        PlayerId::Two => 'b',
    }
}

fn builder_from_char(c: char) -> Option<PlayerId> {
    match c {
        'a' => Some(PlayerId::One),
        'b' => Some(PlayerId::Two),
        _ => None,
    }
}

/// Encodes a board into notation.
pub fn encode_board(board: &Board) -> String {
    let mut out = String::with_capacity(BOARD_ROWS * (BOARD_COLS * 2 + 1));
    for row in 0..BOARD_ROWS {
        if row > 0 {
            out.push('/');
        }
        for col in 0..BOARD_COLS {
            let cell = board.cell_at(Position::new(row as u8, col as u8));
            out.push(char::from(b'0' + cell.level.height()));
            if let Some(player) = cell.occupant {
                out.push(builder_char(player));
            }
        }
    }
    out
}

/// Parses one row of cells into `board`.
fn parse_row(row: usize, s: &str, board: &mut Board) -> Result<(), NotationError> {
    let mut chars = s.chars().peekable();
    let mut col = 0;
    while let Some(c) = chars.next() {
        let level = c
            .to_digit(10)
            .and_then(|d| Level::from_height(d as u8))
            .ok_or(NotationError::InvalidLevel(c))?;
        if col >= BOARD_COLS {
            col += 1;
            continue;
        }
        let pos = Position::new(row as u8, col as u8);
        board.set_level(pos, level);
        if let Some(player) = chars.peek().copied().and_then(builder_from_char) {
            chars.next();
            if level == Level::Dome {
                return Err(NotationError::BuilderOnDome(pos));
            }
            board.place_occupant(pos, player);
        }
        col += 1;
    }
    if col != BOARD_COLS {
        return Err(NotationError::WrongRowLength { row, len: col });
    }
    Ok(())
}

/// Parses board notation.
pub fn parse_board(s: &str) -> Result<Board, NotationError> {
    let rows: Vec<&str> = s.trim().split('/').collect();
    if rows.len() != BOARD_ROWS {
        return Err(NotationError::WrongRowCount(rows.len()));
    }
    let mut board = Board::new();
    for (row, text) in rows.iter().enumerate() {
        parse_row(row, text, &mut board)?;
    }
    Ok(board)
}
