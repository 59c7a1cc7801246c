//! Linecast - A Single-Threaded TCP Line Relay
//!
//! Clients connect over TCP and send newline-delimited text. Every line is
//! rebroadcast to all other connected clients, prefixed with the sender's
//! identity, and arrivals and departures are announced the same way.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Linecast                                   │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ TCP Listener│───>│  Readiness  │───>│ Event Loop  │                  │
//! │  │ (acceptor)  │    │   wait()    │    │   turn()    │                  │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘                  │
//! │                                               │                         │
//! │                         ┌─────────────────────┼──────────────────┐      │
//! │                         ▼                     ▼                  ▼      │
//! │                  ┌─────────────┐      ┌─────────────┐    ┌────────────┐ │
//! │                  │  Registry   │      │ LineFramer  │    │ Broadcast  │ │
//! │                  │ id -> Client│      │ per client  │    │  fan-out   │ │
//! │                  └─────────────┘      └─────────────┘    └────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Protocol
//!
//! ```text
//! server: client <id> just arrived\n
//! client <id>: <line>\n
//! server: client <id> just left\n
//! ```
//!
//! Identities are handed out from 0 in admission order and never reused.
//!
//! ## Quick Start
//!
//! ```no_run
//! use linecast::{Config, Server};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), linecast::RelayError> {
//!     let config = Config::from_args(std::env::args().skip(1))?;
//!     Server::bind(&config).await?.run().await
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`config`]: Command-line configuration
//! - [`protocol`]: Line framing and wire messages
//! - [`registry`]: Admitted clients, identities and capacity
//! - [`server`]: Readiness polling, event loop and broadcasting
//! - [`error`]: Fatal and per-connection errors
//!
//! ## Design Highlights
//!
//! ### One Task, No Locks
//!
//! The loop runs on a current-thread runtime and owns all state. Reads and
//! writes use `try_read`/`try_write`, so nothing blocks except the single
//! readiness wait at the top of each iteration.
//!
//! ### Bounded Memory
//!
//! A client whose unterminated line grows past the size ceiling is
//! disconnected. Other clients' buffers are unaffected.
//!
//! ### Best-Effort Delivery
//!
//! A peer that cannot take a write right now misses that message. A failed
//! write never closes a connection; only the read side does that.

pub mod config;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError};
pub use error::{ConnectionError, RelayError};
pub use protocol::{FrameError, LineFramer, Message};
pub use registry::{Client, ClientId, Registry, RegistryError};
pub use server::{RelayStats, Server};

/// The only host the relay binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default ceiling on simultaneously admitted clients
pub const MAX_CLIENTS: usize = 128 * 1024;

/// Default ceiling on a client's unterminated line (1 MB)
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Size of the buffer each read burst lands in (16 KB)
pub const READ_CHUNK_SIZE: usize = 16 * 1024;

/// Version of Linecast
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
