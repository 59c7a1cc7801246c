//! Relay Wire Messages
//!
//! Everything the server ever sends is one of three newline-terminated
//! text lines:
//!
//! | Event              | Wire text                            |
//! |--------------------|--------------------------------------|
//! | client admitted    | `server: client <id> just arrived\n` |
//! | line from a client | `client <id>: <line>\n`              |
//! | client removed     | `server: client <id> just left\n`    |
//!
//! The relayed `<line>` is copied byte for byte, so a line carrying null
//! bytes or invalid UTF-8 is forwarded as-is.

use crate::protocol::framer::NEWLINE;
use crate::registry::ClientId;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// A message the server fans out to connected peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<'a> {
    /// A new client was admitted
    Arrived(ClientId),

    /// A client was removed
    Left(ClientId),

    /// A complete line received from `from`, without its newline
    Relay { from: ClientId, line: &'a [u8] },
}

impl<'a> Message<'a> {
    /// Creates a relay message for a framed line.
    pub fn relay(from: ClientId, line: &'a [u8]) -> Self {
        Message::Relay { from, line }
    }

    /// The client this message is about. It never receives the message.
    pub fn subject(&self) -> ClientId {
        match self {
            Message::Arrived(id) | Message::Left(id) => *id,
            Message::Relay { from, .. } => *from,
        }
    }

    /// Renders the message into its wire bytes.
    ///
    /// # Example
    /// ```
    /// use linecast::protocol::Message;
    /// use linecast::registry::ClientId;
    ///
    /// let bytes = Message::relay(ClientId::new(1), b"hello").serialize();
    /// assert_eq!(&bytes[..], b"client 1: hello\n");
    /// ```
    pub fn serialize(&self) -> Bytes {
        match self {
            Message::Arrived(id) => Bytes::from(format!("server: client {} just arrived\n", id)),
            Message::Left(id) => Bytes::from(format!("server: client {} just left\n", id)),
            Message::Relay { from, line } => {
                let prefix = format!("client {}: ", from);
                let mut buf = BytesMut::with_capacity(prefix.len() + line.len() + 1);
                buf.put_slice(prefix.as_bytes());
                buf.put_slice(line);
                buf.put_u8(NEWLINE);
                buf.freeze()
            }
        }
    }
}

impl fmt::Display for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Arrived(id) => write!(f, "arrived({})", id),
            Message::Left(id) => write!(f, "left({})", id),
            Message::Relay { from, line } => write!(f, "relay({}, {} bytes)", from, line.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrival_text() {
        let bytes = Message::Arrived(ClientId::new(0)).serialize();
        assert_eq!(&bytes[..], b"server: client 0 just arrived\n");
    }

    #[test]
    fn test_departure_text() {
        let bytes = Message::Left(ClientId::new(42)).serialize();
        assert_eq!(&bytes[..], b"server: client 42 just left\n");
    }

    #[test]
    fn test_relay_text() {
        let bytes = Message::relay(ClientId::new(1), b"hello").serialize();
        assert_eq!(&bytes[..], b"client 1: hello\n");
    }

    #[test]
    fn test_relay_empty_line() {
        let bytes = Message::relay(ClientId::new(3), b"").serialize();
        assert_eq!(&bytes[..], b"client 3: \n");
    }

    #[test]
    fn test_relay_is_binary_safe() {
        let bytes = Message::relay(ClientId::new(7), b"a\x00b\xff").serialize();
        assert_eq!(&bytes[..], b"client 7: a\x00b\xff\n");
    }

    #[test]
    fn test_subject() {
        assert_eq!(Message::Arrived(ClientId::new(2)).subject(), ClientId::new(2));
        assert_eq!(Message::relay(ClientId::new(5), b"x").subject(), ClientId::new(5));
    }
}
