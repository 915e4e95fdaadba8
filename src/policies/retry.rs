//! # Retry policy for request chains.
//!
//! [`RetryPolicy`] decides **how many** extra attempts a request chain may make and
//! **how long** to wait before each of them.
//!
//! ```text
//! retry_times = 0            → one attempt, no retries (default)
//! retry_times = 2            → up to 3 attempts in total
//!
//! RetryDelay::Fixed(d)       → wait `d` before every retry (default: 0)
//! RetryDelay::Backoff(p)     → wait `p.next(retry_index)` before every retry
//! ```
//!
//! `Fixed(Duration::ZERO)` and `Backoff(..)` are distinct states: an explicit zero
//! delay never falls back to computed backoff.

use std::time::Duration;

use serde::Deserialize;

use crate::policies::backoff::BackoffPolicy;

/// Rule for the wait before a retry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RetryDelay {
    /// Literal delay applied verbatim to every retry.
    Fixed(Duration),
    /// Delay computed per retry from a backoff policy.
    Backoff(BackoffPolicy),
}

impl Default for RetryDelay {
    /// Returns `Fixed(0)`: retry immediately.
    fn default() -> Self {
        RetryDelay::Fixed(Duration::ZERO)
    }
}

impl RetryDelay {
    /// Delay before the retry that follows `tried` consumed retries (`tried >= 1`).
    pub fn delay_for(&self, tried: u32) -> Duration {
        match self {
            RetryDelay::Fixed(d) => *d,
            RetryDelay::Backoff(policy) => policy.next(tried.saturating_sub(1)),
        }
    }

    /// Maps an optional millisecond value: `Some(ms)` is a literal delay,
    /// `None` selects [`BackoffPolicy::exponential`].
    pub fn from_millis(ms: Option<u64>) -> Self {
        match ms {
            Some(ms) => RetryDelay::Fixed(Duration::from_millis(ms)),
            None => RetryDelay::Backoff(BackoffPolicy::exponential()),
        }
    }
}

/// Pair of (max additional attempts, inter-attempt delay rule).
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use taskslot::{RetryDelay, RetryPolicy};
///
/// let policy = RetryPolicy::new(2).with_delay(RetryDelay::Fixed(Duration::from_millis(50)));
/// assert_eq!(policy.max_attempts(), 3);
/// assert_eq!(policy.retry_delay.delay_for(1), Duration::from_millis(50));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RetryPolicy {
    /// Maximum additional attempts after the first one.
    pub retry_times: u32,
    /// Wait rule before each retry.
    pub retry_delay: RetryDelay,
}

impl RetryPolicy {
    /// Policy with `retry_times` retries and immediate re-attempts.
    pub fn new(retry_times: u32) -> Self {
        Self {
            retry_times,
            retry_delay: RetryDelay::default(),
        }
    }

    /// Policy that never retries.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns a new policy with the given delay rule.
    pub fn with_delay(mut self, retry_delay: RetryDelay) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Returns a new policy using [`BackoffPolicy::exponential`] between retries.
    pub fn with_backoff(self) -> Self {
        self.with_delay(RetryDelay::Backoff(BackoffPolicy::exponential()))
    }

    /// Total attempts the policy allows (first attempt + retries).
    pub fn max_attempts(&self) -> u32 {
        self.retry_times.saturating_add(1)
    }
}

/// Serialized form of a [`RetryPolicy`] used by configuration files.
///
/// A missing `retry_delay_ms` selects exponential backoff; `0` means "retry immediately".
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrySettings {
    /// Maximum additional attempts after the first one.
    pub retry_times: u32,
    /// Literal delay in milliseconds; absent means computed backoff.
    pub retry_delay_ms: Option<u64>,
}

impl From<RetrySettings> for RetryPolicy {
    fn from(s: RetrySettings) -> Self {
        RetryPolicy {
            retry_times: s.retry_times,
            retry_delay: RetryDelay::from_millis(s.retry_delay_ms),
        }
    }
}
