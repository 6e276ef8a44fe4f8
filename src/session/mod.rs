//! Networked play between a host and a guest.
//!
//! A `Session` owns the single connection of one game. Every locally
//! validated action is sent to the peer as a `Move`, and every `Move` the
//! peer sends is replayed into the local `Game` with the local phase deciding
//! what the position means. Both games start identical and apply the same
//! totally ordered actions, so they stay in lockstep. While the peer is on
//! turn the local game is held in `Waiting`.
//!
//! The session never retries. A malformed or out-of-turn message, a move the
//! local rules refuse, or a broken connection ends the session with a fatal
//! `SessionError`.

pub mod config;
mod connection;
pub mod error;
pub mod lobby;

use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use tracing::{debug, info, warn};

pub use config::{Role, SessionConfig, DEFAULT_PORT};
pub use error::SessionError;
pub use lobby::Lobby;

use crate::board::{PlayerId, Position};
use crate::game::{Game, Phase, PlayerKind};
use crate::protocol::{Message, MessageKind};
use connection::Connection;

/// What a handled peer message changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    OpponentName(String),
    PeerReady(bool),
    Started,
    /// The peer's action was replayed; `phase` is the phase it led to.
    RemoteAction { pos: Position, phase: Phase },
    Disconnected,
}

/// One live connection carrying one game.
pub struct Session {
    role: Role,
    seat: PlayerId,
    conn: Connection,
    lobby: Lobby,
    idle_timeout: Option<Duration>,
    closed: bool,
}

impl Session {
    /// Binds the configured port and waits for exactly one guest.
    pub fn host(config: &SessionConfig) -> Result<Self, SessionError> {
        let listener = TcpListener::bind((config.bind, config.port))?;
        let bound = listener.local_addr()?;
        match lan_address() {
            Some(ip) if bound.ip().is_unspecified() => {
                info!(%bound, join = %SocketAddr::new(ip, bound.port()), "waiting for a guest");
            }
            _ => info!(%bound, "waiting for a guest"),
        }
        Self::accept(&listener, config)
    }

    /// Accepts one guest on an already bound listener.
    pub fn accept(listener: &TcpListener, config: &SessionConfig) -> Result<Self, SessionError> {
        let (stream, peer) = listener.accept()?;
        info!(%peer, "guest connected");
        Self::open(Role::Host, stream, config)
    }

    /// Connects to a host and announces the local username.
    pub fn join(addr: impl ToSocketAddrs, config: &SessionConfig) -> Result<Self, SessionError> {
        let stream = TcpStream::connect(addr)?;
        let mut session = Self::open(Role::Guest, stream, config)?;
        info!(peer = %session.peer_addr(), "connected to host");
        session.announce_name()?;
        Ok(session)
    }

    fn open(role: Role, stream: TcpStream, config: &SessionConfig) -> Result<Self, SessionError> {
        Ok(Session {
            role,
            seat: role.seat(),
            conn: Connection::open(stream)?,
            lobby: Lobby::new(config.username.clone()),
            idle_timeout: config.idle_timeout,
            closed: false,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The seat the local player occupies.
    pub fn seat(&self) -> PlayerId {
        self.seat
    }

    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.conn.peer_addr()
    }

    pub fn is_started(&self) -> bool {
        self.lobby.started
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Sends the local display name.
    pub fn announce_name(&mut self) -> Result<(), SessionError> {
        let name = self.lobby.local_name.clone();
        self.send(Message::Username(name))?;
        self.lobby.name_sent = true;
        Ok(())
    }

    /// Updates and announces local readiness.
    pub fn set_ready(&mut self, ready: bool) -> Result<(), SessionError> {
        self.send(Message::Ready(ready))?;
        self.lobby.local_ready = ready;
        Ok(())
    }

    /// Host only: tells the guest to begin once both sides are ready.
    pub fn start(&mut self, game: &mut Game) -> Result<(), SessionError> {
        if self.role != Role::Host {
            return Err(SessionError::NotHost);
        }
        if !self.lobby.can_start() {
            return Err(SessionError::LobbyNotReady);
        }
        self.send(Message::Start)?;
        self.begin(game);
        Ok(())
    }

    /// Applies a local action and, if the rules accept it, sends it to the peer.
    ///
    /// Rejected actions are returned as `SessionError::Rejected` and never sent.
    pub fn play(&mut self, game: &mut Game, pos: Position) -> Result<Phase, SessionError> {
        self.ensure_open()?;
        if !self.lobby.started {
            return Err(SessionError::NotStarted);
        }
        let seq = game.action_count();
        game.play(pos)?;
        self.send(Message::Move { seq, pos })?;
        self.sync_lockout(game);
        Ok(game.current_phase())
    }

    /// Handles every message already received, without blocking.
    pub fn poll(&mut self, game: &mut Game) -> Result<Vec<SessionEvent>, SessionError> {
        let mut events = Vec::new();
        while !self.closed {
            let Some(item) = self.conn.try_recv() else {
                break;
            };
            let event = self.dispatch(game, item)?;
            events.push(event);
        }
        Ok(events)
    }

    /// Blocks until the next peer message arrives and handles it.
    ///
    /// The idle timeout only runs while the peer owes a message: in the
    /// lobby, or while the local game is waiting on the peer's turn.
    pub fn wait(&mut self, game: &mut Game) -> Result<SessionEvent, SessionError> {
        self.ensure_open()?;
        let limit = if !self.lobby.started || game.is_suspended() {
            self.idle_timeout
        } else {
            None
        };
        let item = self.conn.recv(limit);
        self.dispatch(game, item)
    }

    /// Handles peer messages until the local player may act again or the game ends.
    pub fn wait_for_turn(&mut self, game: &mut Game) -> Result<Vec<SessionEvent>, SessionError> {
        let mut events = Vec::new();
        while self.lobby.started && game.is_suspended() {
            let event = self.wait(game)?;
            let done = event == SessionEvent::Disconnected;
            events.push(event);
            if done {
                break;
            }
        }
        Ok(events)
    }

    /// Sends the teardown notice and closes the connection.
    pub fn disconnect(&mut self) -> Result<(), SessionError> {
        if self.closed {
            return Ok(());
        }
        let sent = self.send(Message::Disconnect);
        self.closed = true;
        self.conn.shutdown();
        info!("session closed");
        sent
    }

    // === Internals ===

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    fn send(&mut self, msg: Message) -> Result<(), SessionError> {
        self.ensure_open()?;
        debug!(kind = ?msg.kind(), "sending");
        if let Err(e) = self.conn.send(&msg) {
            warn!(error = %e, "send failed, closing session");
            self.closed = true;
            return Err(e);
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        game: &mut Game,
        item: Result<Message, SessionError>,
    ) -> Result<SessionEvent, SessionError> {
        let result = item.and_then(|msg| self.handle(game, msg));
        if let Err(e) = &result {
            if e.is_fatal() {
                warn!(error = %e, "session failed");
                self.closed = true;
            }
        }
        result
    }

    fn handle(&mut self, game: &mut Game, msg: Message) -> Result<SessionEvent, SessionError> {
        debug!(kind = ?msg.kind(), "received");
        match msg {
            Message::Move { seq, pos } => self.apply_remote(game, seq, pos),
            Message::Username(name) => {
                game.player_mut(self.seat.opponent()).name = name.clone();
                self.lobby.opponent_name = Some(name.clone());
                if !self.lobby.name_sent {
                    self.announce_name()?;
                }
                Ok(SessionEvent::OpponentName(name))
            }
            Message::Ready(ready) => {
                self.lobby.peer_ready = ready;
                Ok(SessionEvent::PeerReady(ready))
            }
            Message::Start => {
                if self.role == Role::Host || self.lobby.started {
                    return Err(SessionError::Unexpected(MessageKind::Start));
                }
                self.begin(game);
                Ok(SessionEvent::Started)
            }
            Message::Disconnect => {
                info!("peer disconnected");
                self.closed = true;
                self.conn.shutdown();
                Ok(SessionEvent::Disconnected)
            }
        }
    }

    fn apply_remote(&mut self, game: &mut Game, seq: u32, pos: Position) -> Result<SessionEvent, SessionError> {
        let peer = self.seat.opponent();
        if !self.lobby.started || game.current_player() != peer {
            return Err(SessionError::Unexpected(MessageKind::Move));
        }
        let expected = game.action_count();
        if seq != expected {
            return Err(SessionError::Desync { expected, got: seq });
        }

        game.resume();
        let applied = game.play(pos);
        self.sync_lockout(game);
        if let Err(source) = applied {
            return Err(SessionError::IllegalRemoteMove { pos, source });
        }
        debug!(%pos, phase = %game.effective_phase(), "peer action applied");
        Ok(SessionEvent::RemoteAction {
            pos,
            phase: game.effective_phase(),
        })
    }

    fn begin(&mut self, game: &mut Game) {
        self.lobby.started = true;
        let local = game.player_mut(self.seat);
        local.name = self.lobby.local_name.clone();
        let remote = game.player_mut(self.seat.opponent());
        remote.kind = PlayerKind::Remote;
        if let Some(name) = &self.lobby.opponent_name {
            remote.name = name.clone();
        }
        info!(seat = %self.seat, "game started");
        self.sync_lockout(game);
    }

    /// Holds the game in `Waiting` whenever the peer is on turn.
    fn sync_lockout(&self, game: &mut Game) {
        if game.current_player() == self.seat {
            game.resume();
        } else {
            game.suspend();
        }
    }
}

/// Best guess at the address guests on the local network should dial.
///
/// Connecting a UDP socket sends nothing; it only makes the OS pick the
/// outbound interface.
pub fn lan_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9)).ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified() && !ip.is_loopback()).then_some(ip)
}
