//! Relay statistics.
//!
//! Counters are plain integers: only the event loop ever touches them.

/// Statistics for the relay
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelayStats {
    /// Connections admitted into the registry
    pub admitted: u64,
    /// Connections closed at accept time because the registry was full
    pub rejected: u64,
    /// Clients removed after EOF, a transport error or an overflow
    pub removed: u64,
    /// Complete lines received and fanned out
    pub lines_relayed: u64,
    /// Individual deliveries whose write failed
    pub deliveries_dropped: u64,
    /// Deliveries not attempted because the recipient was not writable
    pub deliveries_skipped: u64,
    /// Total bytes read from clients
    pub bytes_read: u64,
}

impl RelayStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes_read(&mut self, count: usize) {
        self.bytes_read += count as u64;
    }
}
