//! Session failures.
//!
//! Local rule rejections are recoverable: nothing was sent and the game is
//! unchanged. Everything else means the two games can no longer be trusted
//! to agree, and the session is over.

use std::io;

use crate::board::Position;
use crate::game::ActionError;
use crate::protocol::{FrameError, MessageKind};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] ActionError),

    #[error("the game has not started")]
    NotStarted,

    #[error("only the host can start the game")]
    NotHost,

    #[error("both players must be ready before starting")]
    LobbyNotReady,

    #[error("no network session")]
    NoSession,

    #[error("connection failed: {0}")]
    Transport(#[from] io::Error),

    #[error("no message from the peer within the idle timeout")]
    Timeout,

    #[error("connection closed")]
    Closed,

    #[error("peer sent a malformed message: {0}")]
    Malformed(String),

    #[error("unexpected {0:?} message")]
    Unexpected(MessageKind),

    #[error("desynchronized: peer action #{got}, local game at #{expected}")]
    Desync { expected: u32, got: u32 },

    #[error("peer action at {pos} is illegal here: {source}")]
    IllegalRemoteMove { pos: Position, source: ActionError },
}

impl SessionError {
    /// True when the session cannot continue.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SessionError::Rejected(_)
                | SessionError::NotStarted
                | SessionError::NotHost
                | SessionError::LobbyNotReady
                | SessionError::NoSession
        )
    }
}

impl From<FrameError> for SessionError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(e)
                if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) =>
            {
                SessionError::Timeout
            }
            FrameError::Io(e) => SessionError::Transport(e),
            other => SessionError::Malformed(other.to_string()),
        }
    }
}
