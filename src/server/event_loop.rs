//! Event Loop
//!
//! Drives the whole relay from one task. Each iteration ([`Server::turn`])
//! does three things in a fixed order:
//!
//! ```text
//!   1. readiness::wait()          block until something is ready
//!        │
//!        ▼
//!   2. accepted connection?       admit it (at most one per iteration)
//!        │                        and announce "just arrived"
//!        ▼
//!   3. for each readable client   read until WouldBlock / EOF / error,
//!      (registry order)           framing and relaying after every read;
//!                                 EOF, errors and overflow remove it
//! ```
//!
//! Every effect of one iteration is complete before the next readiness
//! query starts. Nothing here is shared across threads, so the registry
//! and the accumulators need no locking.

use crate::config::Config;
use crate::error::{ConnectionError, RelayError};
use crate::protocol::Message;
use crate::registry::{ClientId, Registry, RegistryError};
use crate::server::broadcast;
use crate::server::readiness::{self, Readiness};
use crate::server::stats::RelayStats;
use std::collections::HashSet;
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, trace, warn};

/// The relay server: listener, registry and everything the loop owns.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    registry: Registry<TcpStream>,
    stats: RelayStats,
    read_buf: Vec<u8>,
}

impl Server {
    /// Binds the listener described by `config`.
    pub async fn bind(config: &Config) -> Result<Self, RelayError> {
        let addr = config.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| RelayError::Bind {
                addr: addr.clone(),
                source,
            })?;

        Ok(Self {
            listener,
            registry: Registry::new(config.max_clients, config.max_message_size),
            stats: RelayStats::new(),
            read_buf: vec![0; config.read_chunk_size.max(1)],
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, RelayError> {
        self.listener.local_addr().map_err(RelayError::LocalAddr)
    }

    pub fn registry(&self) -> &Registry<TcpStream> {
        &self.registry
    }

    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    /// Runs the loop until a fatal error occurs.
    ///
    /// The server is consumed, so by the time an error reaches the caller
    /// the listener and every client connection have been closed.
    pub async fn run(mut self) -> Result<(), RelayError> {
        info!(
            addr = %self.local_addr()?,
            capacity = self.registry.capacity(),
            "Relay loop started"
        );

        loop {
            self.turn().await?;
        }
    }

    /// Runs one iteration of the loop.
    pub async fn turn(&mut self) -> Result<(), RelayError> {
        let Readiness {
            accepted,
            readable,
            writable,
        } = readiness::wait(&self.listener, &self.registry).await?;

        match accepted {
            Some(Ok((stream, addr))) => self.admit(stream, addr, &writable),
            Some(Err(e)) => warn!(error = %e, "Failed to accept connection"),
            None => {}
        }

        for id in readable {
            self.drain(id, &writable);
        }

        Ok(())
    }

    /// Registers a new connection and announces it to everyone else.
    fn admit(&mut self, stream: TcpStream, addr: SocketAddr, writable: &HashSet<ClientId>) {
        match self.registry.admit(stream, addr) {
            Ok(id) => {
                self.stats.admitted += 1;
                info!(client = %id, peer = %addr, "Client connected");
                self.broadcast(&Message::Arrived(id), writable);
            }
            Err(RegistryError::CapacityExceeded { capacity }) => {
                self.stats.rejected += 1;
                warn!(peer = %addr, capacity, "Registry full, connection refused");
            }
        }
    }

    /// Reads everything a client has to offer right now.
    ///
    /// Lines are relayed after each read rather than at the end of the
    /// burst. The client is removed on EOF, on a read error, or when its
    /// pending line outgrows the size ceiling.
    fn drain(&mut self, id: ClientId, writable: &HashSet<ClientId>) {
        loop {
            let Some(client) = self.registry.get_mut(id) else {
                return;
            };
            let (stream, framer) = client.parts_mut();

            let result = match stream.try_read(&mut self.read_buf) {
                Ok(0) => Err(ConnectionError::ClientDisconnected),
                Ok(n) => {
                    self.stats.bytes_read(n);
                    trace!(client = %id, bytes = n, "Read data");
                    framer.feed(&self.read_buf[..n]).map_err(ConnectionError::from)
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => Err(ConnectionError::from(e)),
            };

            match result {
                Ok(lines) => {
                    for line in &lines {
                        self.stats.lines_relayed += 1;
                        debug!(client = %id, bytes = line.len(), "Relaying line");
                        self.broadcast(&Message::relay(id, line), writable);
                    }
                }
                Err(reason) => {
                    self.remove(id, reason, writable);
                    return;
                }
            }
        }
    }

    /// Announces a client's departure, then drops it.
    ///
    /// The announcement goes out while the client is still registered so
    /// it is excluded as the sender. Removing an absent client does nothing.
    fn remove(&mut self, id: ClientId, reason: ConnectionError, writable: &HashSet<ClientId>) {
        if !self.registry.contains(id) {
            return;
        }

        match &reason {
            ConnectionError::ClientDisconnected => {
                debug!(client = %id, "Client disconnected")
            }
            ConnectionError::IoError(io_err)
                if io_err.kind() == io::ErrorKind::ConnectionReset =>
            {
                debug!(client = %id, "Connection reset by client")
            }
            _ => warn!(client = %id, error = %reason, "Connection error"),
        }

        self.broadcast(&Message::Left(id), writable);

        if let Some(client) = self.registry.remove(id) {
            self.stats.removed += 1;
            info!(
                client = %id,
                peer = %client.addr(),
                active = self.registry.len(),
                "Client removed"
            );
        }
    }

    fn broadcast(&mut self, message: &Message<'_>, writable: &HashSet<ClientId>) {
        let payload = message.serialize();
        let outcome = broadcast::deliver(&self.registry, writable, message.subject(), &payload);
        self.stats.deliveries_dropped += outcome.dropped as u64;
        self.stats.deliveries_skipped += outcome.skipped as u64;
        trace!(
            message = %message,
            delivered = outcome.delivered,
            dropped = outcome.dropped,
            skipped = outcome.skipped,
            "Broadcast"
        );
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let active = self.registry.len();
        self.registry.clear();
        debug!(closed = active, stats = ?self.stats, "Server shut down");
    }
}
