//! Session settings.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::board::PlayerId;

/// Port the host listens on when none is given.
pub const DEFAULT_PORT: u16 = 7777;

/// Which side of the connection this process is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Listens and accepts exactly one peer. Plays first.
    Host,
    /// Dials a known host.
    Guest,
}

impl Role {
    /// The seat this role plays: the host is player one.
    pub const fn seat(self) -> PlayerId {
        match self {
            Role::Host => PlayerId::One,
            Role::Guest => PlayerId::Two,
        }
    }
}

/// Connection and lobby settings for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Address the host binds to.
    pub bind: IpAddr,
    /// Port the host listens on.
    pub port: u16,
    /// Display name announced to the peer.
    pub username: String,
    /// Give up after this long waiting on a silent peer. Only counts while
    /// the peer owes a message. `None` waits forever.
    pub idle_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            username: "Player".to_string(),
            idle_timeout: None,
        }
    }
}
