//! Retry policy for API requests

use std::time::Duration;

/// Delay between failed attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `step × attempt` (5s, 10s, ... for a 5s step)
    Linear(Duration),
    /// Same delay after every attempt
    Constant(Duration),
}

impl Backoff {
    /// Delay after the given failed attempt (1-based)
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Linear(step) => step.saturating_mul(attempt),
            Self::Constant(delay) => delay,
        }
    }
}

/// Bounded retry with backoff, plus rate-limit handling
///
/// Rate-limited responses (HTTP 429) wait for the server's `Retry-After`
/// and do not count against `max_attempts`; they are capped separately by
/// `max_rate_limit_waits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per request, including the first
    pub max_attempts: u32,
    /// Delay between failed attempts
    pub backoff: Backoff,
    /// Wait used when a 429 carries no usable `Retry-After`
    pub default_rate_limit_wait: Duration,
    /// Rate-limit waits allowed per request
    pub max_rate_limit_waits: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Linear(Duration::from_secs(5)),
            default_rate_limit_wait: Duration::from_secs(60),
            max_rate_limit_waits: 10,
        }
    }
}

impl RetryPolicy {
    /// Delay after the given failed attempt, or `None` when attempts are used up
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.max_attempts).then(|| self.backoff.delay(attempt))
    }

    /// How long to wait for a 429 with the given `Retry-After` header value
    pub fn rate_limit_wait(&self, retry_after: Option<&str>) -> Duration {
        retry_after
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map_or(self.default_rate_limit_wait, Duration::from_secs)
    }
}
