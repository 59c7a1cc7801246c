//! Relay Server Module
//!
//! The connection multiplexer: one task, one readiness query per
//! iteration, no per-connection tasks and no locks.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Server                               │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │  readiness  │───>│  Registry   │───>│ LineFramer  │      │
//! │  │   wait()    │    │ admit/remove│    │   feed()    │      │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘      │
//! │                                               │             │
//! │                                               ▼             │
//! │                                      ┌─────────────┐        │
//! │                                      │  broadcast  │        │
//! │                                      │  deliver()  │        │
//! │                                      └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use linecast::{Config, Server};
//!
//! # async fn example() -> Result<(), linecast::RelayError> {
//! let config = Config { port: 4242, ..Config::default() };
//! let server = Server::bind(&config).await?;
//! server.run().await
//! # }
//! ```

pub mod broadcast;
pub mod event_loop;
pub mod readiness;
pub mod stats;

// Re-export commonly used types
pub use broadcast::{deliver, write_fully, Delivery, Outbound};
pub use event_loop::Server;
pub use readiness::Readiness;
pub use stats::RelayStats;
