//! Pre-game lobby state for one session.

/// Names and readiness exchanged before the host starts the game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lobby {
    pub local_name: String,
    pub opponent_name: Option<String>,
    pub local_ready: bool,
    pub peer_ready: bool,
    pub started: bool,
    pub(crate) name_sent: bool,
}

impl Lobby {
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            ..Self::default()
        }
    }

    /// True once both sides are ready and the game has not begun.
    pub fn can_start(&self) -> bool {
        self.local_ready && self.peer_ready && !self.started
    }
}
