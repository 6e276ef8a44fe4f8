//! Wire protocol and text formats.
//!
//! This module defines the peer message vocabulary and its line framing,
//! the compact board notation, and the command parser for the console
//! front end.

pub mod framing;
pub mod message;
pub mod notation;
pub mod parser;

pub use framing::{read_message, write_message, FrameError, MAX_FRAME_LEN};
pub use message::{Message, MessageKind};
pub use notation::{encode_board, parse_board, NotationError};
pub use parser::{parse_command, Command};
