//! # Backoff policy for retried requests.
//!
//! [`BackoffPolicy`] controls how retry delays grow after repeated failures.
//! It is parameterized by:
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::first`] the delay before the first retry;
//! - [`BackoffPolicy::max`] the maximum delay cap.
//!
//! The delay for retry index `n` (0-based) is `first × factor^n`, clamped to `max`,
//! then jitter is applied. The base is derived purely from the index, so jitter
//! output never feeds back into later delays.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use taskslot::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::from_millis(100));
//! assert_eq!(backoff.next(1), Duration::from_millis(200));
//! assert_eq!(backoff.next(10), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Retry backoff policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub first: Duration,
    /// Maximum delay cap (applied before jitter).
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Jitter policy to spread concurrent retries.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns [`BackoffPolicy::exponential`].
    fn default() -> Self {
        Self::exponential()
    }
}

impl BackoffPolicy {
    /// Geometric backoff used when no literal retry delay is configured.
    ///
    /// After `k` failed attempts (`k >= 1`) the wait is
    /// `round((3^(k+1) + random[0,1)) × 1000)` ms: ~9s, ~27s, ~81s, ...
    /// The base is capped at 24h.
    pub fn exponential() -> Self {
        Self {
            first: Duration::from_secs(9),
            max: Duration::from_secs(24 * 60 * 60),
            factor: 3.0,
            jitter: JitterPolicy::Additive {
                spread: Duration::from_secs(1),
            },
        }
    }

    /// Constant delay without jitter.
    pub fn constant(delay: Duration) -> Self {
        Self {
            first: delay,
            max: delay,
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Computes the delay for the given retry index (0-based).
    ///
    /// # Notes
    /// - If `factor` equals 1.0, the delay stays at `first` (up to `max`).
    /// - Overflowing or non-finite intermediate values clamp to `max`.
    pub fn next(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let clamped_exp = attempt.min(i32::MAX as u32) as i32;
        let unclamped_secs = self.first.as_secs_f64() * self.factor.powi(clamped_exp);

        let base =
            if !unclamped_secs.is_finite() || unclamped_secs < 0.0 || unclamped_secs > max_secs {
                self.max
            } else {
                Duration::from_secs_f64(unclamped_secs)
            };

        self.jitter.apply(base)
    }
}
