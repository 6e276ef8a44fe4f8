//! The rule engine.
//!
//! `Game` owns the board and both players, validates every command against
//! the current phase and the board geometry, applies it, and advances the
//! phase machine. The engine holds no randomness: replaying the same command
//! sequence on a fresh game always reproduces the same board.

use tracing::{debug, info};

use super::error::ActionError;
use super::event::GameEvent;
use super::phase::Phase;
use super::player::Player;
use crate::board::{Board, Cell, PlayerId, Position};

/// Builders each player puts on the board during placement.
pub const BUILDERS_PER_PLAYER: u8 = 2;

/// Authoritative game state for one match.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    players: [Player; 2],
    phase: Phase,
    /// Phase to restore when leaving `Waiting`.
    suspended: Option<Phase>,
    current: PlayerId,
    selected: Option<Position>,
    winner: Option<PlayerId>,
    placed: [u8; 2],
    /// Number of validated actions applied since the start of the game.
    actions: u32,
    events: Vec<GameEvent>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new([Player::human(PlayerId::One), Player::human(PlayerId::Two)])
    }
}

impl Game {
    /// Starts a new game in placement with player one on turn.
    pub fn new(players: [Player; 2]) -> Self {
        Game {
            board: Board::new(),
            players,
            phase: Phase::Placement,
            suspended: None,
            current: PlayerId::One,
            selected: None,
            winner: None,
            placed: [0; 2],
            actions: 0,
            events: Vec::new(),
        }
    }

    /// Starts a game from an arbitrary board with `current` on turn.
    ///
    /// If both players already have all their builders down the game begins
    /// in selection (and may end immediately if `current` is stuck);
    /// otherwise it resumes placement. A board carrying more than
    /// `BUILDERS_PER_PLAYER` builders for either player is refused.
    pub fn from_board(players: [Player; 2], board: Board, current: PlayerId) -> Result<Self, ActionError> {
        let mut game = Game::new(players);
        game.board = board;
        game.current = current;
        for id in [PlayerId::One, PlayerId::Two] {
            let count = board.builders_of(id).count();
            if count > BUILDERS_PER_PLAYER as usize {
                return Err(ActionError::TooManyBuilders(id));
            }
            game.placed[id.index()] = count as u8;
        }
        if game.placed.iter().all(|&n| n == BUILDERS_PER_PLAYER) {
            game.enter_selection();
        } else if game.placed[current.index()] == BUILDERS_PER_PLAYER {
            game.current = current.opponent();
        }
        game.events.clear();
        Ok(game)
    }

    /// Clears the board and starts over with the same players.
    pub fn reset(&mut self) {
        self.board.reset();
        self.suspended = None;
        self.current = PlayerId::One;
        self.selected = None;
        self.winner = None;
        self.placed = [0; 2];
        self.actions = 0;
        self.events.clear();
        self.set_phase(Phase::Placement);
    }

    // === Queries ===

    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    /// The winner, once the game is finished.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// The builder picked for the current turn, if any.
    pub fn selected_builder(&self) -> Option<Position> {
        self.selected
    }

    /// True while local commands are locked out.
    pub fn is_suspended(&self) -> bool {
        self.phase == Phase::Waiting
    }

    /// The phase that is active, or would be active once resumed.
    pub fn effective_phase(&self) -> Phase {
        self.suspended.unwrap_or(self.phase)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Contents of a cell, or `None` for positions off the board.
    pub fn cell_at(&self, pos: Position) -> Option<Cell> {
        pos.in_bounds().then(|| self.board.cell_at(pos))
    }

    /// Cells a builder standing on `pos` could move to.
    pub fn reachable_cells(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.in_bounds()
            .then(|| self.board.reachable_cells(pos))
            .into_iter()
            .flatten()
    }

    /// Cells a builder standing on `pos` could build on.
    pub fn buildable_cells(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.in_bounds()
            .then(|| self.board.buildable_cells(pos))
            .into_iter()
            .flatten()
    }

    /// Number of validated actions applied so far.
    pub fn action_count(&self) -> u32 {
        self.actions
    }

    /// Builders each player has placed so far.
    pub fn placed_builders(&self, id: PlayerId) -> u8 {
        self.placed[id.index()]
    }

    /// Drains queued notifications.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Lockout ===

    /// Forces the game into `Waiting` so no command can mutate it.
    /// Does nothing if the game is already waiting or finished.
    pub fn suspend(&mut self) {
        if self.phase.is_active() {
            self.suspended = Some(self.phase);
            self.set_phase(Phase::Waiting);
        }
    }

    /// Leaves `Waiting` and restores the suspended phase.
    pub fn resume(&mut self) {
        if let Some(phase) = self.suspended.take() {
            self.set_phase(phase);
        }
    }

    // === Commands ===

    /// Applies an action at `pos`, interpreted according to the current phase.
    ///
    /// During movement, naming another of the current player's builders
    /// switches the selection instead of moving.
    pub fn play(&mut self, pos: Position) -> Result<Phase, ActionError> {
        self.check_open()?;
        if !pos.in_bounds() {
            return Err(ActionError::OutOfBounds(pos));
        }
        match self.phase {
            Phase::Placement => self.place_builder(pos),
            Phase::Selection => self.select_builder(pos),
            Phase::Movement => {
                if self.selected != Some(pos) && self.board.is_occupied_by(pos, self.current) {
                    self.select_builder(pos)
                } else {
                    self.move_builder(pos)
                }
            }
            Phase::Construction => self.build(pos),
            Phase::Waiting | Phase::Finished => unreachable!("checked by check_open"),
        }
    }

    /// Puts one of the current player's builders on a free cell.
    pub fn place_builder(&mut self, pos: Position) -> Result<Phase, ActionError> {
        self.check(Phase::Placement, pos)?;
        if !self.board.is_free(pos) || self.board.is_dome(pos) {
            return Err(ActionError::Occupied(pos));
        }

        self.board.place_occupant(pos, self.current);
        self.placed[self.current.index()] += 1;
        self.actions += 1;
        debug!(player = %self.current, %pos, "builder placed");

        if self.placed[self.current.index()] == BUILDERS_PER_PLAYER {
            self.rotate();
            if self.placed.iter().all(|&n| n == BUILDERS_PER_PLAYER) {
                // Player one always opens the first turn.
                if self.current != PlayerId::One {
                    self.rotate();
                }
                self.enter_selection();
            }
        }
        Ok(self.phase)
    }

    /// Picks the builder used this turn. Allowed in selection, and in
    /// movement to switch to the other builder before it has moved.
    pub fn select_builder(&mut self, pos: Position) -> Result<Phase, ActionError> {
        self.check_open()?;
        if !matches!(self.phase, Phase::Selection | Phase::Movement) {
            return Err(ActionError::WrongPhase {
                expected: Phase::Selection,
                actual: self.phase,
            });
        }
        if !pos.in_bounds() {
            return Err(ActionError::OutOfBounds(pos));
        }
        if !self.board.is_occupied_by(pos, self.current) {
            return Err(ActionError::NotOwnBuilder(pos));
        }
        if self.board.reachable_cells(pos).next().is_none() {
            return Err(ActionError::Immobile(pos));
        }

        self.selected = Some(pos);
        self.actions += 1;
        debug!(player = %self.current, %pos, "builder selected");
        self.set_phase(Phase::Movement);
        Ok(self.phase)
    }

    /// Moves the selected builder. Climbing onto level 3 wins at once.
    pub fn move_builder(&mut self, dest: Position) -> Result<Phase, ActionError> {
        self.check(Phase::Movement, dest)?;
        let from = self.selected.ok_or(ActionError::NoSelection)?;
        if !self.board.can_move_into(dest, from) {
            return Err(ActionError::Unreachable { from, to: dest });
        }

        self.board.remove_occupant(from);
        self.board.place_occupant(dest, self.current);
        self.selected = Some(dest);
        self.actions += 1;
        debug!(player = %self.current, %from, to = %dest, "builder moved");

        if self.board.is_level3(dest) {
            self.finish(self.current);
        } else {
            self.set_phase(Phase::Construction);
        }
        Ok(self.phase)
    }

    /// Builds one level next to the builder that just moved, then ends the turn.
    pub fn build(&mut self, pos: Position) -> Result<Phase, ActionError> {
        self.check(Phase::Construction, pos)?;
        let from = self.selected.ok_or(ActionError::NoSelection)?;
        if !self.board.can_build_at(pos, from) {
            return Err(ActionError::NotBuildable { from, to: pos });
        }

        self.board.upgrade(pos);
        self.actions += 1;
        debug!(player = %self.current, %pos, level = ?self.board.level(pos), "built");

        self.selected = None;
        self.rotate();
        self.enter_selection();
        Ok(self.phase)
    }

    // === Internals ===

    fn check_open(&self) -> Result<(), ActionError> {
        match self.phase {
            Phase::Waiting => Err(ActionError::Waiting),
            Phase::Finished => Err(ActionError::GameOver),
            _ => Ok(()),
        }
    }

    fn check(&self, expected: Phase, pos: Position) -> Result<(), ActionError> {
        self.check_open()?;
        if self.phase != expected {
            return Err(ActionError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        if !pos.in_bounds() {
            return Err(ActionError::OutOfBounds(pos));
        }
        Ok(())
    }

    /// Starts the current player's turn, ending the game if they cannot move.
    fn enter_selection(&mut self) {
        if self.board.has_mobile_builder(self.current) {
            self.set_phase(Phase::Selection);
        } else {
            info!(player = %self.current, "no legal move left");
            self.finish(self.current.opponent());
        }
    }

    fn rotate(&mut self) {
        self.current = self.current.opponent();
        self.events.push(GameEvent::TurnRotated { to: self.current });
    }

    fn finish(&mut self, winner: PlayerId) {
        self.winner = Some(winner);
        self.selected = None;
        self.set_phase(Phase::Finished);
        self.events.push(GameEvent::GameOver { winner });
        info!(%winner, "game over");
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.phase;
        if from != to {
            self.phase = to;
            self.events.push(GameEvent::PhaseChanged { from, to });
            debug!(%from, %to, "phase changed");
        }
    }
}
