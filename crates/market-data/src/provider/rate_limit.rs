//! Provider rate limiting configuration.

use std::time::Duration;

/// How aggressively a provider may be called.
#[derive(Clone, Debug)]
pub struct RateLimit {
    /// Sustained request budget.
    pub requests_per_minute: u32,

    /// Requests that may go out back-to-back before throttling kicks in.
    pub burst_capacity: u32,

    /// Lower bound on any wait imposed by the limiter.
    pub min_delay: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            burst_capacity: 5,
            min_delay: Duration::from_millis(100),
        }
    }
}
