#![forbid(unsafe_code)]

//! Host-controlled clock.
//!
//! The synchronizer never reads wall-clock time. The host advances a monotonic
//! instant (for notice expiry) and sets the calendar date (for date-picker
//! lower bounds) explicitly, which keeps replays deterministic.

use core::time::Duration;

use chrono::NaiveDate;

/// Deterministic clock owned by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostClock {
    now: Duration,
    today: NaiveDate,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new(NaiveDate::default())
    }
}

impl HostClock {
    /// Create a clock at monotonic zero on the given calendar date.
    #[must_use]
    pub const fn new(today: NaiveDate) -> Self {
        Self {
            now: Duration::ZERO,
            today,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Current calendar date.
    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    /// Set current monotonic time. Time never moves backwards.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Change the calendar date (for example at midnight).
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }
}
