//! Newline-delimited JSON framing.
//!
//! One message per line over any ordered byte stream. A frame is only
//! handed to the caller once its terminating newline has arrived.

use std::io::{BufRead, Read, Write};

use super::message::Message;

/// Upper bound on a single encoded frame, newline included.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("frame exceeds {MAX_FRAME_LEN} bytes")]
    TooLong,

    #[error("stream ended in the middle of a frame")]
    Truncated,
}

/// Encodes `msg` as one line and flushes it.
pub fn write_message<W: Write>(out: &mut W, msg: &Message) -> Result<(), FrameError> {
    serde_json::to_writer(&mut *out, msg)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Reads the next message. Returns `Ok(None)` when the stream ends cleanly
/// between frames. Blank lines are skipped.
pub fn read_message<R: BufRead>(input: &mut R) -> Result<Option<Message>, FrameError> {
    let mut line = String::new();
    loop {
        line.clear();
        let n = (&mut *input).take(MAX_FRAME_LEN as u64).read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        if !line.ends_with('\n') {
            return Err(if n >= MAX_FRAME_LEN {
                FrameError::TooLong
            } else {
                FrameError::Truncated
            });
        }
        if !line.trim().is_empty() {
            break;
        }
    }
    Ok(Some(serde_json::from_str(line.trim_end())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;
    use std::io::Cursor;

    #[test]
    fn messages_come_back_in_order() {
        let mut buf = Vec::new();
        let sent = vec![
            Message::Username("host".to_string()),
            Message::Ready(true),
            Message::Start,
            Message::Move { seq: 0, pos: Position::new(2, 3) },
            Message::Disconnect,
        ];
        for msg in &sent {
            write_message(&mut buf, msg).unwrap();
        }

        let mut reader = Cursor::new(buf);
        let mut received = Vec::new();
        while let Some(msg) = read_message(&mut reader).unwrap() {
            received.push(msg);
        }
        assert_eq!(received, sent);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut reader = Cursor::new(b"\n\n{\"kind\":\"START\"}\n".to_vec());
        assert_eq!(read_message(&mut reader).unwrap(), Some(Message::Start));
        assert_eq!(read_message(&mut reader).unwrap(), None);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let mut reader = Cursor::new(b"hello\n".to_vec());
        assert!(matches!(read_message(&mut reader), Err(FrameError::Decode(_))));
    }

    #[test]
    fn partial_frame_is_truncated() {
        let mut reader = Cursor::new(b"{\"kind\":\"ST".to_vec());
        assert!(matches!(read_message(&mut reader), Err(FrameError::Truncated)));
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let mut data = vec![b'a'; MAX_FRAME_LEN + 10];
        data.push(b'\n');
        let mut reader = Cursor::new(data);
        assert!(matches!(read_message(&mut reader), Err(FrameError::TooLong)));
    }
}
