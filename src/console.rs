//! Line-oriented front end state.
//!
//! Holds the game, one controller per seat and, when playing over the
//! network, the session. Each parsed command is applied and answered with
//! one or more lines on the output writer:
//!
//! ```text
//! ok <phase>            local action accepted
//! ai <pos> <phase>      a strategy played for its seat
//! remote <pos> <phase>  the peer's action was replayed
//! error <message>       command refused, nothing changed
//! turn <player>         the turn passed to that player
//! winner <player>       the game just ended
//! ```
//!
//! `turn` and `winner` lines come from the game's event queue, which is
//! drained after every action.

use std::io::{self, Write};

use tracing::warn;

use crate::agent::Controller;
use crate::board::{PlayerId, Position};
use crate::game::{ActionError, Game, GameEvent, Phase, Player};
use crate::protocol::{encode_board, Command};
use crate::session::{Session, SessionError, SessionEvent};

/// Upper bound on strategy moves per command, so two AI seats cannot spin forever.
const MAX_AI_ACTIONS: usize = 1000;

pub struct Console {
    pub game: Game,
    seats: [Controller; 2],
    session: Option<Session>,
}

impl Console {
    /// Hot-seat or local AI play.
    pub fn local(seats: [Controller; 2]) -> Self {
        let mut game = Game::default();
        for (id, seat) in [PlayerId::One, PlayerId::Two].into_iter().zip(&seats) {
            game.player_mut(id).kind = seat.kind();
        }
        Console {
            game,
            seats,
            session: None,
        }
    }

    /// Networked play. `local` drives this side's seat; the other is the peer.
    pub fn networked(session: Session, local: Controller) -> Self {
        let seat = session.seat();
        let mut seats = [Controller::Remote, Controller::Remote];
        seats[seat.index()] = local;
        let mut console = Console::local(seats);
        console.session = Some(session);
        console
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Applies one command. Returns `false` once the front end should exit.
    pub fn handle<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<bool> {
        let drained = self.drain(out)?;
        match cmd {
            Command::Place(pos) => self.handle_action(Some(Phase::Placement), pos, out)?,
            Command::Select(pos) => self.handle_action(Some(Phase::Selection), pos, out)?,
            Command::Move(pos) => self.handle_action(Some(Phase::Movement), pos, out)?,
            Command::Build(pos) => self.handle_action(Some(Phase::Construction), pos, out)?,
            Command::Play(pos) => self.handle_action(None, pos, out)?,
            Command::Position { board, current } => {
                if self.session.is_some() {
                    writeln!(out, "error positions cannot be loaded during a network game")?;
                } else {
                    let players: [Player; 2] = [
                        self.game.player(PlayerId::One).clone(),
                        self.game.player(PlayerId::Two).clone(),
                    ];
                    match Game::from_board(players, board, current) {
                        Ok(game) => {
                            self.game = game;
                            writeln!(out, "ok {}", self.game.current_phase())?;
                            self.report_events(out)?;
                            self.run_ai(out)?;
                        }
                        Err(e) => writeln!(out, "error {}", e)?,
                    }
                }
            }
            Command::NewGame => {
                if self.session.is_some() {
                    writeln!(out, "error a network game cannot be restarted")?;
                } else {
                    self.game.reset();
                    self.game.take_events();
                    writeln!(out, "ok {}", self.game.current_phase())?;
                    self.run_ai(out)?;
                }
            }
            Command::Board => self.handle_board(out)?,
            Command::Status => self.handle_status(out)?,
            Command::Ready(ready) => {
                let result = self.with_session(|session, _| session.set_ready(ready));
                self.report(result.map(|()| format!("ok ready {}", ready)), out)?;
            }
            Command::Start => {
                let result = self.with_session(|session, game| session.start(game));
                self.report(result.map(|()| "started".to_string()), out)?;
                self.run_ai(out)?;
            }
            Command::Wait => self.handle_wait(drained, out)?,
            Command::Quit => {
                if let Some(session) = self.session.as_mut() {
                    if let Err(e) = session.disconnect() {
                        warn!(error = %e, "disconnect failed");
                    }
                }
                writeln!(out, "bye")?;
                out.flush()?;
                return Ok(false);
            }
        }
        self.report_events(out)?;
        out.flush()?;
        Ok(true)
    }

    fn handle_action<W: Write>(&mut self, expected: Option<Phase>, pos: Position, out: &mut W) -> io::Result<()> {
        let result = self.act(expected, pos);
        let accepted = result.is_ok();
        self.report(result.map(|phase| format!("ok {}", phase)), out)?;
        if accepted {
            self.report_events(out)?;
            self.run_ai(out)?;
        }
        Ok(())
    }

    fn act(&mut self, expected: Option<Phase>, pos: Position) -> Result<Phase, SessionError> {
        match self.session.as_mut() {
            None => {
                let game = &mut self.game;
                let phase = match expected {
                    Some(Phase::Placement) => game.place_builder(pos)?,
                    Some(Phase::Selection) => game.select_builder(pos)?,
                    Some(Phase::Movement) => game.move_builder(pos)?,
                    Some(Phase::Construction) => game.build(pos)?,
                    _ => game.play(pos)?,
                };
                Ok(phase)
            }
            Some(session) => {
                if let Some(expected) = expected {
                    check_command_phase(&self.game, expected, pos)?;
                }
                session.play(&mut self.game, pos)
            }
        }
    }

    /// Before the game starts, blocks for one peer message unless some just
    /// arrived. During the game, blocks until the local seat is on turn.
    fn handle_wait<W: Write>(&mut self, drained: usize, out: &mut W) -> io::Result<()> {
        let result = self.with_session(|session, game| {
            if session.is_started() {
                session.wait_for_turn(game)
            } else if drained > 0 {
                Ok(Vec::new())
            } else {
                session.wait(game).map(|event| vec![event])
            }
        });
        match result {
            Ok(events) => {
                for event in events {
                    self.print_event(&event, out)?;
                }
                self.report_events(out)?;
                self.run_ai(out)?;
            }
            Err(e) => self.report::<_, String>(Err(e), out)?,
        }
        Ok(())
    }

    fn handle_board<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self.game.board())?;
        writeln!(out, "notation {}", encode_board(self.game.board()))
    }

    fn handle_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let game = &self.game;
        writeln!(out, "phase {}", game.current_phase())?;
        writeln!(out, "turn {}", game.current_player())?;
        match game.selected_builder() {
            Some(pos) => writeln!(out, "selected {}", pos)?,
            None => writeln!(out, "selected none")?,
        }
        writeln!(out, "actions {}", game.action_count())?;
        if let Some(winner) = game.winner() {
            writeln!(out, "winner {}", winner)?;
        }
        if let Some(session) = &self.session {
            let lobby = session.lobby();
            writeln!(
                out,
                "session {:?} seat {} opponent {} ready {}/{} started {}",
                session.role(),
                session.seat(),
                lobby.opponent_name.as_deref().unwrap_or("?"),
                lobby.local_ready,
                lobby.peer_ready,
                lobby.started,
            )?;
        }
        Ok(())
    }

    /// Lets strategy-driven seats play until a human or the peer is on turn.
    fn run_ai<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for _ in 0..MAX_AI_ACTIONS {
            if !self.game.current_phase().is_active() {
                break;
            }
            let seat = self.game.current_player().index();
            let Some(pos) = self.seats[seat].next_action(&self.game) else {
                break;
            };
            match self.act(None, pos) {
                Ok(phase) => writeln!(out, "ai {} {}", pos, phase)?,
                Err(e) => {
                    self.report::<_, String>(Err(e), out)?;
                    break;
                }
            }
            self.report_events(out)?;
        }
        Ok(())
    }

    /// Reports peer messages that arrived since the last command.
    fn drain<W: Write>(&mut self, out: &mut W) -> io::Result<usize> {
        let Some(session) = self.session.as_mut() else {
            return Ok(0);
        };
        if session.is_closed() {
            return Ok(0);
        }
        match session.poll(&mut self.game) {
            Ok(events) => {
                for event in &events {
                    self.print_event(event, out)?;
                }
                self.report_events(out)?;
                Ok(events.len())
            }
            Err(e) => {
                self.report::<_, String>(Err(e), out)?;
                Ok(1)
            }
        }
    }

    fn print_event<W: Write>(&self, event: &SessionEvent, out: &mut W) -> io::Result<()> {
        match event {
            SessionEvent::OpponentName(name) => writeln!(out, "opponent {}", name),
            SessionEvent::PeerReady(ready) => writeln!(out, "peer ready {}", ready),
            SessionEvent::Started => writeln!(out, "started"),
            SessionEvent::RemoteAction { pos, phase } => writeln!(out, "remote {} {}", pos, phase),
            SessionEvent::Disconnected => writeln!(out, "disconnected"),
        }
    }

    /// Drains the game's event queue into `turn` and `winner` lines.
    fn report_events<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for event in self.game.take_events() {
            match event {
                GameEvent::TurnRotated { to } => writeln!(out, "turn {}", to)?,
                GameEvent::GameOver { winner } => writeln!(out, "winner {}", winner)?,
                GameEvent::PhaseChanged { .. } => {}
            }
        }
        Ok(())
    }

    fn report<W: Write, T: std::fmt::Display>(&self, result: Result<T, SessionError>, out: &mut W) -> io::Result<()> {
        match result {
            Ok(line) => writeln!(out, "{}", line),
            Err(e) => {
                if e.is_fatal() {
                    warn!(error = %e, "session ended");
                }
                writeln!(out, "error {}", e)
            }
        }
    }

    fn with_session<T>(
        &mut self,
        f: impl FnOnce(&mut Session, &mut Game) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        match self.session.as_mut() {
            Some(session) => f(session, &mut self.game),
            None => Err(SessionError::NoSession),
        }
    }
}

/// Rejects a phase-specific command issued in another phase. Selection is
/// also accepted while moving, to switch builders.
fn check_command_phase(game: &Game, expected: Phase, pos: Position) -> Result<(), ActionError> {
    let actual = game.current_phase();
    if actual == Phase::Waiting {
        return Err(ActionError::Waiting);
    }
    let switching = expected == Phase::Selection && actual == Phase::Movement;
    if actual != expected && !switching {
        return Err(ActionError::WrongPhase { expected, actual });
    }
    if expected == Phase::Movement && game.board().is_occupied_by(pos, game.current_player()) {
        let from = game.selected_builder().ok_or(ActionError::NoSelection)?;
        return Err(ActionError::Unreachable { from, to: pos });
    }
    Ok(())
}
