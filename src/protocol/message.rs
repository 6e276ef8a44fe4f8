//! Peer-to-peer message vocabulary.
//!
//! A closed set of message kinds exchanged between host and guest. Each kind
//! carries exactly its own payload. Messages serialize to JSON objects of the
//! form `{"kind": "MOVE", "payload": {...}}` (see `framing.rs`).
//!
//! `Move` carries only a board position. The receiver interprets it with its
//! own current phase, which is kept in lockstep with the sender's. `seq` is
//! the sender's validated-action count before the action and lets the
//! receiver detect a diverged game instead of silently misapplying a move.

use serde::{Deserialize, Serialize};

use crate::board::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// "I performed an action at this position."
    Move { seq: u32, pos: Position },
    /// Announces or updates the sender's display name.
    Username(String),
    /// Lobby readiness of the sender.
    Ready(bool),
    /// Host tells the guest the game begins.
    Start,
    /// Graceful teardown notice.
    Disconnect,
}

/// Payload-free discriminant of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Move,
    Username,
    Ready,
    Start,
    Disconnect,
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Move { .. } => MessageKind::Move,
            Message::Username(_) => MessageKind::Username,
            Message::Ready(_) => MessageKind::Ready,
            Message::Start => MessageKind::Start,
            Message::Disconnect => MessageKind::Disconnect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(msg: &Message) -> Message {
        let json = serde_json::to_string(msg).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn every_kind_survives_encoding() {
        let messages = [
            Message::Move { seq: 17, pos: Position::new(4, 0) },
            Message::Username("Ariane".to_string()),
            Message::Username(String::new()),
            Message::Ready(true),
            Message::Ready(false),
            Message::Start,
            Message::Disconnect,
        ];
        for msg in &messages {
            assert_eq!(&roundtrip(msg), msg);
        }
    }

    #[test]
    fn wire_shape_is_kind_and_payload() {
        let json = serde_json::to_string(&Message::Move { seq: 3, pos: Position::new(1, 2) }).unwrap();
        assert_eq!(json, r#"{"kind":"MOVE","payload":{"seq":3,"pos":{"row":1,"col":2}}}"#);
        let json = serde_json::to_string(&Message::Start).unwrap();
        assert_eq!(json, r#"{"kind":"START"}"#);
        let json = serde_json::to_string(&Message::Ready(true)).unwrap();
        assert_eq!(json, r#"{"kind":"READY","payload":true}"#);
    }

    #[test]
    fn payload_type_is_fixed_by_kind() {
        assert!(serde_json::from_str::<Message>(r#"{"kind":"READY","payload":"yes"}"#).is_err());
        assert!(serde_json::from_str::<Message>(r#"{"kind":"USERNAME","payload":5}"#).is_err());
        assert!(serde_json::from_str::<Message>(r#"{"kind":"JUMP"}"#).is_err());
    }

    #[test]
    fn kind_accessor() {
        assert_eq!(Message::Start.kind(), MessageKind::Start);
        assert_eq!(Message::Ready(false).kind(), MessageKind::Ready);
        assert_eq!(
            Message::Move { seq: 0, pos: Position::new(0, 0) }.kind(),
            MessageKind::Move
        );
    }
}
