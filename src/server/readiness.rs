//! Readiness Multiplexing
//!
//! The event loop's only suspension point. One call to [`wait`] polls the
//! listener and every registered client inside a single `poll_fn`, and
//! completes once there is something to service:
//!
//! - the listener produced a connection (or an accept error), or
//! - at least one client is readable (data, end of stream or an error)
//!
//! Writability is sampled in the same pass and frozen into the snapshot.
//! Broadcasts in this iteration only go to clients in that set. Writability
//! alone never completes the wait: sockets are almost always writable, so
//! waking on it would spin.
//!
//! Write readiness is what the reactor has cached for each socket. A socket
//! admitted in the previous iteration has no cached readiness until the
//! reactor has turned once, so `wait` yields to the runtime before polling.
//! That turn picks up every pending readiness event, including the initial
//! writability of fresh connections, and the snapshot then matches what
//! the OS reports.
//!
//! There is no timeout. With no traffic the loop sleeps indefinitely.

use crate::error::RelayError;
use crate::registry::{ClientId, Registry};
use std::collections::HashSet;
use std::future::poll_fn;
use std::io;
use std::net::SocketAddr;
use std::task::Poll;
use tokio::net::{TcpListener, TcpStream};

/// What one readiness query found.
#[derive(Debug, Default)]
pub struct Readiness {
    /// At most one connection taken off the listener
    pub accepted: Option<io::Result<(TcpStream, SocketAddr)>>,

    /// Readable clients, in registry order
    pub readable: Vec<ClientId>,

    /// Clients that can take writes this iteration
    pub writable: HashSet<ClientId>,
}

impl Readiness {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_none() && self.readable.is_empty()
    }
}

/// Blocks until the listener or a client needs servicing.
///
/// A failing readiness poll on a client means the reactor itself is gone,
/// which is fatal.
pub async fn wait(
    listener: &TcpListener,
    registry: &Registry<TcpStream>,
) -> Result<Readiness, RelayError> {
    // Let the reactor record readiness for sockets registered since the
    // last time this task was suspended.
    tokio::task::yield_now().await;

    poll_fn(|cx| {
        let mut readiness = Readiness::default();

        if let Poll::Ready(result) = listener.poll_accept(cx) {
            readiness.accepted = Some(result);
        }

        for client in registry.iter() {
            let stream = client.stream();

            match stream.poll_read_ready(cx) {
                Poll::Ready(Ok(())) => readiness.readable.push(client.id()),
                Poll::Ready(Err(e)) => return Poll::Ready(Err(RelayError::Readiness(e))),
                Poll::Pending => {}
            }

            match stream.poll_write_ready(cx) {
                Poll::Ready(Ok(())) => {
                    readiness.writable.insert(client.id());
                }
                Poll::Ready(Err(e)) => return Poll::Ready(Err(RelayError::Readiness(e))),
                Poll::Pending => {}
            }
        }

        if readiness.is_empty() {
            Poll::Pending
        } else {
            Poll::Ready(Ok(readiness))
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_wait_yields_new_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let registry: Registry<TcpStream> = Registry::new(4, 64);

        let _client = TcpStream::connect(addr).await.unwrap();

        let readiness = timeout(WAIT, wait(&listener, &registry))
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(readiness.accepted, Some(Ok(_))));
        assert!(readiness.readable.is_empty());
    }

    #[tokio::test]
    async fn test_wait_reports_readable_and_writable_clients() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut registry = Registry::new(4, 64);

        let _quiet = TcpStream::connect(addr).await.unwrap();
        let (stream, peer) = listener.accept().await.unwrap();
        let quiet_id = registry.admit(stream, peer).unwrap();

        let mut talker = TcpStream::connect(addr).await.unwrap();
        let (stream, peer) = listener.accept().await.unwrap();
        let talker_id = registry.admit(stream, peer).unwrap();

        talker.write_all(b"hello\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let readiness = timeout(WAIT, wait(&listener, &registry))
            .await
            .unwrap()
            .unwrap();
        assert!(readiness.accepted.is_none());
        assert_eq!(readiness.readable, vec![talker_id]);
        assert!(readiness.writable.contains(&quiet_id));
        assert!(readiness.writable.contains(&talker_id));
    }

    #[tokio::test]
    async fn test_freshly_admitted_client_is_writable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut registry = Registry::new(4, 64);

        // Both connections are queued before either is accepted
        let _first = TcpStream::connect(addr).await.unwrap();
        let _second = TcpStream::connect(addr).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let (stream, peer) = listener.accept().await.unwrap();
        let first_id = registry.admit(stream, peer).unwrap();

        // No other await between admission and the next query
        let readiness = timeout(WAIT, wait(&listener, &registry))
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(readiness.accepted, Some(Ok(_))));
        assert!(readiness.writable.contains(&first_id));
    }

    #[tokio::test]
    async fn test_wait_blocks_without_activity() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let registry: Registry<TcpStream> = Registry::new(4, 64);

        let result = timeout(Duration::from_millis(100), wait(&listener, &registry)).await;
        assert!(result.is_err());
    }
}
