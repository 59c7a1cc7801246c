//! Line Protocol Implementation
//!
//! The relay speaks plain newline-delimited text. There is no handshake,
//! no length prefix and no escaping: a frame is a maximal run of bytes
//! ended by a single `\n`.
//!
//! ## Modules
//!
//! - `framer`: Accumulates inbound bytes and cuts complete lines
//! - `message`: The three server-emitted message kinds and their wire text
//!
//! ## Example
//!
//! ```
//! use linecast::protocol::{LineFramer, Message};
//! use linecast::registry::ClientId;
//!
//! let mut framer = LineFramer::new(1024);
//! let lines = framer.feed(b"hello\n").unwrap();
//!
//! let wire = Message::relay(ClientId::new(1), &lines[0]).serialize();
//! assert_eq!(&wire[..], b"client 1: hello\n");
//! ```

pub mod framer;
pub mod message;

// Re-export commonly used types for convenience
pub use framer::{FrameError, LineFramer, NEWLINE};
pub use message::Message;
