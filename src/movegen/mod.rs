//! Legal action generation.
//!
//! Enumerates every position `Game::play` would accept in the current phase,
//! and picks one at random for the fallback strategy.

use rand::Rng;

use crate::board::Position;
use crate::game::{Game, Phase};

/// Every position `Game::play` accepts right now, in row-major order.
///
/// A suspended or finished game has none. During movement only destination
/// cells are listed; switching builders is left to the caller.
pub fn legal_positions(game: &Game) -> Vec<Position> {
    let board = game.board();
    let player = game.current_player();
    match game.current_phase() {
        Phase::Placement => Position::all()
            .filter(|&pos| board.is_free(pos) && !board.is_dome(pos))
            .collect(),
        Phase::Selection => board
            .builders_of(player)
            .filter(|&pos| board.reachable_cells(pos).next().is_some())
            .collect(),
        Phase::Movement => match game.selected_builder() {
            Some(from) => board.reachable_cells(from).collect(),
            None => Vec::new(),
        },
        Phase::Construction => match game.selected_builder() {
            Some(from) => board.buildable_cells(from).collect(),
            None => Vec::new(),
        },
        Phase::Waiting | Phase::Finished => Vec::new(),
    }
}

/// Picks one legal position uniformly, or `None` when there is nothing to play.
pub fn random_position(game: &Game, rng: &mut impl Rng) -> Option<Position> {
    let legal = legal_positions(game);
    if legal.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..legal.len());
    Some(legal[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, PlayerId, CELL_COUNT};
    use crate::game::Player;
    use crate::protocol::parse_board;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn players() -> [Player; 2] {
        [Player::human(PlayerId::One), Player::human(PlayerId::Two)]
    }

    #[test]
    fn placement_lists_every_free_cell() {
        let mut game = Game::default();
        assert_eq!(legal_positions(&game).len(), CELL_COUNT);
        game.play(Position::new(2, 2)).unwrap();
        let legal = legal_positions(&game);
        assert_eq!(legal.len(), CELL_COUNT - 1);
        assert!(!legal.contains(&Position::new(2, 2)));
    }

    #[test]
    fn placement_skips_domes() {
        let mut board = Board::new();
        board.add_dome(Position::new(0, 0));
        let game = Game::from_board(players(), board, PlayerId::One).unwrap();
        assert!(!legal_positions(&game).contains(&Position::new(0, 0)));
    }

    #[test]
    fn selection_lists_only_mobile_builders() {
        // Player one's builder in the corner is boxed in by domes.
        let board = parse_board("0a4000/44000/00000/00a00/0000b0b").unwrap();
        let game = Game::from_board(players(), board, PlayerId::One).unwrap();
        assert_eq!(game.current_phase(), Phase::Selection);
        assert_eq!(legal_positions(&game), vec![Position::new(3, 2)]);
    }

    #[test]
    fn every_listed_position_is_accepted() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut game = Game::default();
        for _ in 0..200 {
            let legal = legal_positions(&game);
            if legal.is_empty() {
                break;
            }
            for &pos in &legal {
                let mut probe = game.clone();
                assert!(probe.play(pos).is_ok(), "{} rejected in {}", pos, game.current_phase());
            }
            let pos = random_position(&game, &mut rng).unwrap();
            game.play(pos).unwrap();
        }
    }

    #[test]
    fn nothing_to_play_while_waiting() {
        let mut game = Game::default();
        game.suspend();
        assert!(legal_positions(&game).is_empty());
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(random_position(&game, &mut rng), None);
    }
}
