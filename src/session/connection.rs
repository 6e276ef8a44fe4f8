//! One TCP connection to the peer.
//!
//! Outgoing frames are written directly on the caller's thread. Incoming
//! frames are decoded by a background reader thread and queued on a channel,
//! so the owner drains remote messages from the same place it issues local
//! commands. The reader exits after a `Disconnect`, at end of stream, or on
//! the first error, which it queues before leaving. The socket itself never
//! times out; the owner bounds its own waits with `recv`.

use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace};

use super::error::SessionError;
use crate::protocol::{read_message, write_message, Message};

type Inbound = Result<Message, SessionError>;

pub(crate) struct Connection {
    stream: TcpStream,
    writer: BufWriter<TcpStream>,
    inbox: Receiver<Inbound>,
    reader: Option<JoinHandle<()>>,
    peer: SocketAddr,
}

impl Connection {
    /// Wraps a connected stream and starts its reader thread.
    pub(crate) fn open(stream: TcpStream) -> Result<Self, SessionError> {
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr()?;
        let read_half = stream.try_clone()?;
        let writer = BufWriter::new(stream.try_clone()?);

        let (tx, inbox) = mpsc::channel();
        let reader = thread::Builder::new()
            .name(format!("santorini-recv-{}", peer))
            .spawn(move || receive_loop(read_half, tx))?;

        Ok(Connection {
            stream,
            writer,
            inbox,
            reader: Some(reader),
            peer,
        })
    }

    pub(crate) fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub(crate) fn send(&mut self, msg: &Message) -> Result<(), SessionError> {
        trace!(?msg, "send");
        write_message(&mut self.writer, msg)?;
        Ok(())
    }

    /// Next queued message without blocking.
    pub(crate) fn try_recv(&self) -> Option<Inbound> {
        match self.inbox.try_recv() {
            Ok(item) => Some(item),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(SessionError::Closed)),
        }
    }

    /// Blocks until the reader thread queues something, or for at most `limit`.
    pub(crate) fn recv(&self, limit: Option<Duration>) -> Inbound {
        match limit {
            None => self.inbox.recv().unwrap_or(Err(SessionError::Closed)),
            Some(limit) => match self.inbox.recv_timeout(limit) {
                Ok(item) => item,
                Err(RecvTimeoutError::Timeout) => Err(SessionError::Timeout),
                Err(RecvTimeoutError::Disconnected) => Err(SessionError::Closed),
            },
        }
    }

    /// Closes both directions and waits for the reader thread to exit.
    pub(crate) fn shutdown(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn receive_loop(stream: TcpStream, tx: Sender<Inbound>) {
    let mut reader = BufReader::new(stream);
    loop {
        let (item, last) = match read_message(&mut reader) {
            Ok(Some(msg)) => {
                trace!(?msg, "recv");
                let last = msg == Message::Disconnect;
                (Ok(msg), last)
            }
            Ok(None) => (Err(SessionError::Closed), true),
            Err(e) => (Err(SessionError::from(e)), true),
        };
        if tx.send(item).is_err() || last {
            break;
        }
    }
    debug!("receive loop finished");
}
