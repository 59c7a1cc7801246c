//! A single admitted connection.

use crate::protocol::LineFramer;
use std::fmt;
use std::net::SocketAddr;

/// Identity handed to a client at admission.
///
/// Identities start at 0, grow by one per admission and are never reused,
/// even after the client that held one is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(u64);

impl ClientId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered connection: its identity, its transport and the partial
/// line it is still sending.
#[derive(Debug)]
pub struct Client<S> {
    id: ClientId,
    addr: SocketAddr,
    stream: S,
    framer: LineFramer,
}

impl<S> Client<S> {
    pub(crate) fn new(id: ClientId, addr: SocketAddr, stream: S, max_message_size: usize) -> Self {
        Self {
            id,
            addr,
            stream,
            framer: LineFramer::new(max_message_size),
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Peer address, for logging.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn framer(&self) -> &LineFramer {
        &self.framer
    }

    pub fn framer_mut(&mut self) -> &mut LineFramer {
        &mut self.framer
    }

    /// Splits the client into its transport and framer so both can be used
    /// at once during a read burst.
    pub fn parts_mut(&mut self) -> (&S, &mut LineFramer) {
        (&self.stream, &mut self.framer)
    }
}
