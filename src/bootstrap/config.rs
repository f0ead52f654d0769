use std::time::Duration;

/// Delay used by [`SettlePolicy::FixedDelay`] unless configured otherwise.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(15);

/// Receipt polling for [`SettlePolicy::Confirmation`].
///
/// # Examples
///
/// ```rust
/// use unified_relayer::bootstrap::ConfirmationPolling;
///
/// // Use defaults (40 attempts, 3 second intervals)
/// let polling = ConfirmationPolling::default();
/// assert_eq!(polling.total_timeout_secs(), 120);
///
/// let polling = ConfirmationPolling::default()
///     .with_max_attempts(10)
///     .with_poll_interval_secs(1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolling {
    /// Receipt lookups before giving up.
    pub max_attempts: u32,
    /// Seconds to wait between lookups.
    pub poll_interval_secs: u64,
}

impl Default for ConfirmationPolling {
    /// - `max_attempts`: 40
    /// - `poll_interval_secs`: 3
    fn default() -> Self {
        Self {
            max_attempts: 40,
            poll_interval_secs: 3,
        }
    }
}

impl ConfirmationPolling {
    /// Sets the maximum number of receipt lookups.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the interval between receipt lookups in seconds.
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Returns the total maximum wait time in seconds.
    pub fn total_timeout_secs(&self) -> u64 {
        self.max_attempts as u64 * self.poll_interval_secs
    }
}

/// How the bootstrap waits for one step to land before sending the next.
///
/// Defaults to a fixed 15 second delay after the first two steps, with no
/// receipt checks. [`SettlePolicy::confirmation`] opts into receipt polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Sleep a fixed time after each step except the last, without checking
    /// that the transaction was mined.
    FixedDelay(Duration),
    /// Poll for the receipt after every step and fail if it reverts or never
    /// arrives.
    Confirmation(ConfirmationPolling),
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self::fixed_delay()
    }
}

impl SettlePolicy {
    /// Fixed 15 second delay between steps.
    pub fn fixed_delay() -> Self {
        Self::FixedDelay(DEFAULT_SETTLE_DELAY)
    }

    /// Receipt polling with the default 40 x 3 second budget.
    pub fn confirmation() -> Self {
        Self::Confirmation(ConfirmationPolling::default())
    }
}
