//! Client Registry
//!
//! Maps each live connection to its [`Client`], hands out identities and
//! enforces the capacity ceiling.
//!
//! The registry is keyed by [`ClientId`]. Identities are unique and never
//! reused, so the key doubles as a stable handle for the connection while
//! the OS-level socket itself is owned by the `Client`. A `BTreeMap` keeps
//! iteration in admission order, which is the order the event loop
//! services clients and the order broadcasts visit recipients.
//!
//! The registry is generic over the transport `S` so the bookkeeping can be
//! exercised without real sockets.

use crate::registry::client::{Client, ClientId};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors returned by the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry already holds `capacity` clients
    #[error("client capacity reached ({capacity})")]
    CapacityExceeded { capacity: usize },
}

/// The set of admitted clients.
#[derive(Debug)]
pub struct Registry<S> {
    clients: BTreeMap<ClientId, Client<S>>,
    next_id: u64,
    capacity: usize,
    max_message_size: usize,
}

impl<S> Registry<S> {
    /// Creates an empty registry.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of simultaneously admitted clients
    /// * `max_message_size` - Ceiling for each client's pending line
    pub fn new(capacity: usize, max_message_size: usize) -> Self {
        Self {
            clients: BTreeMap::new(),
            next_id: 0,
            capacity,
            max_message_size,
        }
    }

    /// Admits a new connection and returns its identity.
    ///
    /// When the registry is full the stream is dropped here, which closes
    /// it, and no identity is consumed.
    pub fn admit(&mut self, stream: S, addr: SocketAddr) -> Result<ClientId, RegistryError> {
        if self.clients.len() >= self.capacity {
            drop(stream);
            return Err(RegistryError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let id = ClientId::new(self.next_id);
        self.next_id += 1;

        self.clients
            .insert(id, Client::new(id, addr, stream, self.max_message_size));
        trace!(client = %id, peer = %addr, active = self.clients.len(), "Client registered");

        Ok(id)
    }

    /// Unregisters a client and hands it back so the caller decides when
    /// its stream is closed.
    ///
    /// Removing an identity that is not registered is a no-op.
    pub fn remove(&mut self, id: ClientId) -> Option<Client<S>> {
        let client = self.clients.remove(&id)?;
        if !client.framer().is_empty() {
            debug!(
                client = %id,
                discarded = client.framer().len(),
                "Dropping unterminated input"
            );
        }
        Some(client)
    }

    pub fn get(&self, id: ClientId) -> Option<&Client<S>> {
        self.clients.get(&id)
    }

    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut Client<S>> {
        self.clients.get_mut(&id)
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.contains_key(&id)
    }

    /// Iterates clients in admission order.
    pub fn iter(&self) -> impl Iterator<Item = &Client<S>> {
        self.clients.values()
    }

    /// Identities of all registered clients, in admission order.
    pub fn ids(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.clients.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.clients.len() >= self.capacity
    }

    /// The identity the next admission will receive.
    pub fn next_id(&self) -> ClientId {
        ClientId::new(self.next_id)
    }

    /// Drops every client, closing all their streams.
    pub fn clear(&mut self) {
        self.clients.clear();
    }
}
