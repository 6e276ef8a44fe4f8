//! Who supplies the next action for a seat.
//!
//! A seat is driven by the console user, by a `Strategy`, or by the peer of a
//! network session. Strategies only ever see the game read-only and return a
//! position; the caller feeds it back through `Game::play` like any other
//! input.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::Position;
use crate::game::{Game, PlayerKind};
use crate::movegen::random_position;

pub use crate::movegen::legal_positions;

/// Chooses the next position for whatever phase the game is in.
pub trait Strategy {
    /// `None` when the game offers nothing to play.
    fn choose(&mut self, game: &Game) -> Option<Position>;
}

/// Uniform choice among legal positions.
pub struct RandomStrategy {
    rng: SmallRng,
}

impl RandomStrategy {
    /// Seeded for reproducible games. A seed of 0 draws from entropy.
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        RandomStrategy { rng }
    }
}

impl Strategy for RandomStrategy {
    fn choose(&mut self, game: &Game) -> Option<Position> {
        random_position(game, &mut self.rng)
    }
}

/// The source of actions for one seat.
pub enum Controller {
    Human,
    Ai(Box<dyn Strategy + Send>),
    Remote,
}

impl Controller {
    pub fn random(seed: u64) -> Self {
        Controller::Ai(Box::new(RandomStrategy::new(seed)))
    }

    pub fn kind(&self) -> PlayerKind {
        match self {
            Controller::Human => PlayerKind::Human,
            Controller::Ai(_) => PlayerKind::Ai,
            Controller::Remote => PlayerKind::Remote,
        }
    }

    /// Asks the strategy for a move. Always `None` for humans and peers.
    pub fn next_action(&mut self, game: &Game) -> Option<Position> {
        match self {
            Controller::Ai(strategy) => strategy.choose(game),
            Controller::Human | Controller::Remote => None,
        }
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.kind())
    }
}
