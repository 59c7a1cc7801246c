//! Error types for the relay.
//!
//! Failures fall into two classes. A [`ConnectionError`] ends one
//! connection and never escalates. A [`RelayError`] means the server can
//! no longer run; it is returned all the way up to `main`, which takes the
//! fatal path.

use crate::config::ConfigError;
use crate::protocol::FrameError;
use std::io;
use thiserror::Error;

/// Unrecoverable server failures.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The listening socket could not be created, bound or put in listen mode
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    /// The bound address could not be read back
    #[error("failed to read local address: {0}")]
    LocalAddr(#[source] io::Error),

    /// Polling socket readiness failed
    #[error("readiness query failed: {0}")]
    Readiness(#[source] io::Error),
}

/// Why a single connection is being closed.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Orderly end of stream
    #[error("Client disconnected")]
    ClientDisconnected,

    /// I/O error (network issue)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// The client kept sending without a newline past the size ceiling
    #[error("Protocol overflow: {0}")]
    Overflow(#[from] FrameError),
}
