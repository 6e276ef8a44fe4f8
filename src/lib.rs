//! Santorini engine library.
//!
//! Exposes the board, the turn phase machine, legal move generation, the
//! wire protocol and the host/guest session for use by integration tests
//! and the console binary.

pub mod agent;
pub mod board;
pub mod console;
pub mod game;
pub mod movegen;
pub mod protocol;
pub mod session;
