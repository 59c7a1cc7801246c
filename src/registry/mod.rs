//! Client Registry Module
//!
//! Tracks every admitted connection for the event loop.
//!
//! ## Client Lifecycle
//!
//! ```text
//!   accept() ──> admit() ──> Active ──(EOF / error / overflow)──> remove()
//!                  │           ▲  │
//!                  │           └──┘ feed + deliver
//!                  │
//!                  └── registry full: stream closed, no identity used
//! ```
//!
//! - **Identities**: monotonically increasing from 0, never reused
//! - **Capacity**: admission beyond the ceiling is refused, not fatal
//! - **Ownership**: each `Client` owns its socket and its `LineFramer`;
//!   dropping the client closes the connection and frees the buffer

pub mod client;
pub mod table;

// Re-export commonly used types
pub use client::{Client, ClientId};
pub use table::{Registry, RegistryError};
