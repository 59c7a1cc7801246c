//! Newline Line Framer
//!
//! TCP is a stream protocol: a single read may carry half a line, several
//! lines, or several lines followed by the start of the next one. The
//! framer accumulates the bytes of one connection and cuts them into
//! complete lines as soon as a newline arrives.
//!
//! ## How the Framer Works
//!
//! ```text
//!   accumulator          feed(b"lo\nwor")        lines       accumulator
//!   ┌──────────┐        ┌──────────────┐      ┌───────┐    ┌───────────┐
//!   │ "hel"    │ ─────> │ "hello\nwor" │ ───> │"hello"│    │ "wor"     │
//!   └──────────┘        └──────────────┘      └───────┘    └───────────┘
//! ```
//!
//! 1. The incoming bytes are appended to a `BytesMut` accumulator
//! 2. Every newline splits off one line (the newline itself is dropped)
//! 3. Whatever follows the last newline stays behind for the next feed
//!
//! Lines are handed out as `Bytes`, split off the accumulator without
//! copying. The framer is byte-transparent: null bytes and invalid UTF-8
//! travel through untouched.

use bytes::{Bytes, BytesMut};
use thiserror::Error;

/// The only delimiter the protocol knows.
pub const NEWLINE: u8 = b'\n';

/// Errors that can occur while framing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Appending would grow the pending line past the configured ceiling
    #[error("message too large: {size} bytes (max: {max})")]
    Overflow { size: usize, max: usize },
}

/// Per-connection line accumulator.
///
/// # Example
///
/// ```
/// use linecast::protocol::LineFramer;
///
/// let mut framer = LineFramer::new(1024);
/// assert!(framer.feed(b"partial").unwrap().is_empty());
///
/// let lines = framer.feed(b" line\nnext").unwrap();
/// assert_eq!(lines.len(), 1);
/// assert_eq!(lines[0], &b"partial line"[..]);
/// assert_eq!(framer.pending(), b"next");
/// ```
#[derive(Debug)]
pub struct LineFramer {
    /// Bytes received but not yet resolved into a line
    buffer: BytesMut,

    /// Ceiling on the accumulator length
    max_size: usize,
}

impl LineFramer {
    /// Creates an empty framer that refuses to hold more than `max_size` bytes.
    pub fn new(max_size: usize) -> Self {
        Self {
            buffer: BytesMut::new(),
            max_size,
        }
    }

    /// Appends `bytes` and returns every line completed by them, in order.
    ///
    /// Returns `FrameError::Overflow` without touching the accumulator if
    /// the append would push it past the ceiling. The caller is expected to
    /// drop the connection in that case.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<Bytes>, FrameError> {
        let size = self.buffer.len() + bytes.len();
        if size > self.max_size {
            return Err(FrameError::Overflow {
                size,
                max: self.max_size,
            });
        }

        // The accumulator never holds a newline between feeds, so only the
        // freshly appended region needs scanning.
        let mut search_from = self.buffer.len();
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(offset) = find_newline(&self.buffer[search_from..]) {
            let mut line = self.buffer.split_to(search_from + offset + 1);
            line.truncate(line.len() - 1);
            lines.push(line.freeze());
            search_from = 0;
        }

        Ok(lines)
    }

    /// The unterminated fragment waiting for its newline.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[inline]
fn find_newline(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == NEWLINE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let mut framer = LineFramer::new(64);
        let lines = framer.feed(b"hello\n").unwrap();
        assert_eq!(lines, vec![Bytes::from("hello")]);
        assert!(framer.is_empty());
    }

    #[test]
    fn test_partial_line_is_retained() {
        let mut framer = LineFramer::new(64);
        assert!(framer.feed(b"partial").unwrap().is_empty());
        assert_eq!(framer.pending(), b"partial");

        let lines = framer.feed(b" line\n").unwrap();
        assert_eq!(lines, vec![Bytes::from("partial line")]);
        assert!(framer.is_empty());
    }

    #[test]
    fn test_multiple_lines_in_one_feed() {
        let mut framer = LineFramer::new(64);
        let lines = framer.feed(b"one\ntwo\nthree\nfou").unwrap();
        assert_eq!(
            lines,
            vec![Bytes::from("one"), Bytes::from("two"), Bytes::from("three")]
        );
        assert_eq!(framer.pending(), b"fou");
    }

    #[test]
    fn test_line_count_matches_newline_count() {
        let mut framer = LineFramer::new(1024);
        let input = b"a\n\nbb\nccc\n\n\ntail";
        let newlines = input.iter().filter(|&&b| b == NEWLINE).count();

        let mut lines = Vec::new();
        for chunk in input.chunks(3) {
            lines.extend(framer.feed(chunk).unwrap());
        }

        assert_eq!(lines.len(), newlines);
        assert_eq!(
            lines,
            vec![
                Bytes::from("a"),
                Bytes::from(""),
                Bytes::from("bb"),
                Bytes::from("ccc"),
                Bytes::from(""),
                Bytes::from(""),
            ]
        );
        assert_eq!(framer.pending(), b"tail");
    }

    #[test]
    fn test_empty_line() {
        let mut framer = LineFramer::new(64);
        let lines = framer.feed(b"\n").unwrap();
        assert_eq!(lines, vec![Bytes::new()]);
    }

    #[test]
    fn test_null_bytes_are_preserved() {
        let mut framer = LineFramer::new(64);
        let lines = framer.feed(b"hel\x00o\nwo\x00").unwrap();
        assert_eq!(lines, vec![Bytes::from(&b"hel\x00o"[..])]);
        assert_eq!(framer.pending(), b"wo\x00");
    }

    #[test]
    fn test_overflow_leaves_accumulator_untouched() {
        let mut framer = LineFramer::new(8);
        framer.feed(b"12345").unwrap();

        let err = framer.feed(b"6789").unwrap_err();
        assert_eq!(err, FrameError::Overflow { size: 9, max: 8 });
        assert_eq!(framer.pending(), b"12345");
    }

    #[test]
    fn test_exactly_at_ceiling_is_accepted() {
        let mut framer = LineFramer::new(8);
        let lines = framer.feed(b"1234567\n").unwrap();
        assert_eq!(lines, vec![Bytes::from("1234567")]);
    }

    #[test]
    fn test_completed_lines_free_room() {
        let mut framer = LineFramer::new(8);
        framer.feed(b"abcd\nef").unwrap();
        assert_eq!(framer.len(), 2);

        // Only the 2-byte remainder counts against the ceiling now
        let lines = framer.feed(b"ghij\n").unwrap();
        assert_eq!(lines, vec![Bytes::from("efghij")]);
    }
}
