/// Back-pressure settings for a chain monitor.
///
/// Decoded transfers wait in a queue of `queue_capacity` entries; at most
/// `max_in_flight` of them are being relayed at once. When the queue is full
/// the log reader stops pulling from the node until a slot frees up.
///
/// # Examples
///
/// ```rust
/// use unified_relayer::monitor::DispatchConfig;
///
/// // Use defaults (64 queued transfers, 4 concurrent relays)
/// let config = DispatchConfig::default();
///
/// // Relay one transfer at a time
/// let config = DispatchConfig::default().with_max_in_flight(1);
/// assert_eq!(config.max_in_flight(), 1);
/// ```
///
/// Both limits are at least one; the fields are only reachable through the
/// clamping setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    queue_capacity: usize,
    max_in_flight: usize,
}

impl Default for DispatchConfig {
    /// - `queue_capacity`: 64
    /// - `max_in_flight`: 4
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            max_in_flight: 4,
        }
    }
}

impl DispatchConfig {
    /// Sets the queue capacity. Zero is raised to one.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Sets the concurrency limit. Zero is raised to one.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Transfers buffered between the log reader and the relay workers.
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Relays allowed to be pending at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }
}
