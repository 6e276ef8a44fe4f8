//! Console command parser.
//!
//! Parses lines typed into the `santorini` binary into structured `Command`
//! variants that the front-end loop dispatches on.

use tracing::warn;

use super::notation::parse_board;
use crate::board::{Board, PlayerId, Position};

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `place <row> <col>`
    Place(Position),
    /// `select <row> <col>`
    Select(Position),
    /// `move <row> <col>`
    Move(Position),
    /// `build <row> <col>`
    Build(Position),
    /// `play <row> <col>`: act according to the current phase.
    Play(Position),
    /// `position <notation> [1|2]`: load a board (local games only).
    Position { board: Board, current: PlayerId },
    /// Print the board.
    Board,
    /// Print phase, current player and winner.
    Status,
    /// `ready` / `unready`
    Ready(bool),
    /// Host starts the networked game.
    Start,
    /// Block until the peer acts.
    Wait,
    /// Start a fresh local game.
    NewGame,
    /// Leave the program.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&first, args) = tokens.split_first()?;

    match first {
        "place" => parse_position(first, args).map(Command::Place),
        "select" => parse_position(first, args).map(Command::Select),
        "move" => parse_position(first, args).map(Command::Move),
        "build" => parse_position(first, args).map(Command::Build),
        "play" => parse_position(first, args).map(Command::Play),
        "position" => parse_load(args),
        "board" => Some(Command::Board),
        "status" => Some(Command::Status),
        "ready" => Some(Command::Ready(true)),
        "unready" => Some(Command::Ready(false)),
        "start" => Some(Command::Start),
        "wait" => Some(Command::Wait),
        "newgame" => Some(Command::NewGame),
        "quit" | "exit" => Some(Command::Quit),
        other => {
            warn!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `<row> <col>`.
fn parse_position(command: &str, args: &[&str]) -> Option<Position> {
    if args.len() != 2 {
        warn!("malformed {}: expected '{} <row> <col>'", command, command);
        return None;
    }
    match (args[0].parse::<u8>(), args[1].parse::<u8>()) {
        (Ok(row), Ok(col)) => Some(Position::new(row, col)),
        _ => {
            warn!("invalid coordinates: '{} {}'", args[0], args[1]);
            None
        }
    }
}

/// Parses `position <notation> [1|2]`.
fn parse_load(args: &[&str]) -> Option<Command> {
    let notation = match args.first() {
        Some(n) => n,
        None => {
            warn!("malformed position: expected 'position <notation> [1|2]'");
            return None;
        }
    };
    let board = match parse_board(notation) {
        Ok(b) => b,
        Err(e) => {
            warn!("bad board notation: {}", e);
            return None;
        }
    };
    let current = match args.get(1).copied() {
        None | Some("1") => PlayerId::One,
        Some("2") => PlayerId::Two,
        Some(other) => {
            warn!("unknown player: '{}'", other);
            return None;
        }
    };
    Some(Command::Position { board, current })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_actions() {
        assert_eq!(parse_command("place 0 1"), Some(Command::Place(Position::new(0, 1))));
        assert_eq!(parse_command("  select 4 4 "), Some(Command::Select(Position::new(4, 4))));
        assert_eq!(parse_command("move 1 1"), Some(Command::Move(Position::new(1, 1))));
        assert_eq!(parse_command("build 1 0"), Some(Command::Build(Position::new(1, 0))));
        assert_eq!(parse_command("play 2 3"), Some(Command::Play(Position::new(2, 3))));
    }

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("board"), Some(Command::Board));
        assert_eq!(parse_command("status"), Some(Command::Status));
        assert_eq!(parse_command("ready"), Some(Command::Ready(true)));
        assert_eq!(parse_command("unready"), Some(Command::Ready(false)));
        assert_eq!(parse_command("start"), Some(Command::Start));
        assert_eq!(parse_command("wait"), Some(Command::Wait));
        assert_eq!(parse_command("newgame"), Some(Command::NewGame));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("exit"), Some(Command::Quit));
    }

    #[test]
    fn parse_position_command() {
        let cmd = parse_command("position 0a0a000/00000/00000/00000/0000b0b 2").unwrap();
        match cmd {
            Command::Position { board, current } => {
                assert_eq!(current, PlayerId::Two);
                assert!(board.is_occupied_by(Position::new(4, 4), PlayerId::Two));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            parse_command("position 00000/00000/00000/00000/00000"),
            Some(Command::Position { current: PlayerId::One, .. })
        ));
    }

    #[test]
    fn malformed_input_is_ignored() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("jump 1 1"), None);
        assert_eq!(parse_command("move 1"), None);
        assert_eq!(parse_command("move a b"), None);
        assert_eq!(parse_command("move -1 2"), None);
        assert_eq!(parse_command("position"), None);
        assert_eq!(parse_command("position 000"), None);
        assert_eq!(parse_command("position 00000/00000/00000/00000/00000 3"), None);
    }
}
