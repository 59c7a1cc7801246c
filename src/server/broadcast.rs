//! Broadcaster
//!
//! Fans one rendered message out to every registered client except the
//! one it is about. Delivery is best-effort:
//!
//! - only clients found writable in the current iteration's snapshot are
//!   attempted; anyone else misses this message
//! - a short write is retried against the remainder until the whole
//!   payload is out or the socket refuses more
//! - a failed write (including `WouldBlock` and a broken pipe) drops the
//!   message for that one recipient and moves on; the connection itself is
//!   left for the read path to tear down
//!
//! Writes to a peer that already hung up surface as ordinary `io::Error`s
//! from `try_write`, so no process-wide signal handling is involved.

use crate::registry::{ClientId, Registry};
use std::collections::HashSet;
use std::io;
use tokio::net::TcpStream;
use tracing::{trace, warn};

/// A transport that accepts writes without blocking.
pub trait Outbound {
    /// Writes as much of `buf` as the transport takes right now.
    ///
    /// Returns the number of bytes written, or `WouldBlock` if none fit.
    fn try_send(&self, buf: &[u8]) -> io::Result<usize>;
}

impl Outbound for TcpStream {
    fn try_send(&self, buf: &[u8]) -> io::Result<usize> {
        self.try_write(buf)
    }
}

/// Outcome of one fan-out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Recipients that received the whole payload
    pub delivered: usize,
    /// Recipients whose write failed part-way or outright
    pub dropped: usize,
    /// Recipients left out because they were not writable this iteration
    pub skipped: usize,
}

/// Writes the entire buffer, retrying short writes.
///
/// Stops at the first error. A zero-length write counts as `WriteZero`.
pub fn write_fully<S: Outbound + ?Sized>(stream: &S, mut buf: &[u8]) -> io::Result<()> {
    while !buf.is_empty() {
        match stream.try_send(buf) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) => buf = &buf[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Delivers `payload` to every writable client other than `sender`.
///
/// Recipients are visited in registry order.
pub fn deliver<S: Outbound>(
    registry: &Registry<S>,
    writable: &HashSet<ClientId>,
    sender: ClientId,
    payload: &[u8],
) -> Delivery {
    let mut outcome = Delivery::default();

    for client in registry.iter() {
        let id = client.id();
        if id == sender {
            continue;
        }
        if !writable.contains(&id) {
            outcome.skipped += 1;
            trace!(client = %id, "Not writable, skipped");
            continue;
        }

        match write_fully(client.stream(), payload) {
            Ok(()) => {
                outcome.delivered += 1;
                trace!(client = %id, bytes = payload.len(), "Delivered");
            }
            Err(e) => {
                outcome.dropped += 1;
                warn!(client = %id, error = %e, "Dropped delivery");
            }
        }
    }

    outcome
}
