//! # Jitter policy for retry delays.
//!
//! [`JitterPolicy`] adds randomness to backoff delays so that many clients failing
//! at the same moment do not retry in lockstep.
//!
//! - [`JitterPolicy::None`]: no randomization, predictable delays
//! - [`JitterPolicy::Full`]: random delay in `[0, delay]`
//! - [`JitterPolicy::Equal`]: `delay/2 + random[0, delay/2]`
//! - [`JitterPolicy::Additive`]: `delay + random[0, spread)`, rounded to whole milliseconds

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of retry delays.
///
/// ## Trade-offs
/// - **None**: Predictable, but risks synchronized retries
/// - **Full**: Maximum randomness, may shorten delays a lot
/// - **Equal**: Keeps at least half of the computed delay
/// - **Additive**: Never shortens the delay; only pushes it later by up to `spread`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: use the exact backoff delay.
    #[default]
    None,

    /// Full jitter: random delay in `[0, delay]`.
    Full,

    /// Equal jitter: `delay/2 + random[0, delay/2]`.
    Equal,

    /// Additive jitter: `round(delay + random[0, spread))` in milliseconds.
    ///
    /// Used by [`BackoffPolicy::exponential`](crate::BackoffPolicy::exponential)
    /// with `spread = 1s`.
    Additive {
        /// Upper bound (exclusive) of the random offset.
        spread: Duration,
    },
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => full_jitter(delay),
            JitterPolicy::Equal => equal_jitter(delay),
            JitterPolicy::Additive { spread } => additive_jitter(delay, *spread),
        }
    }
}

/// Full jitter: random[0, delay]
fn full_jitter(delay: Duration) -> Duration {
    let ms = delay.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=ms))
}

/// Equal jitter: delay/2 + random[0, delay/2]
fn equal_jitter(delay: Duration) -> Duration {
    let ms = delay.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    let half = ms / 2;
    let jitter = if half == 0 {
        0
    } else {
        rand::rng().random_range(0..=half)
    };
    Duration::from_millis(half + jitter)
}

/// Additive jitter: round(delay + random[0, spread)) in milliseconds.
fn additive_jitter(delay: Duration, spread: Duration) -> Duration {
    let fraction: f64 = rand::rng().random();
    let ms = delay.as_secs_f64() * 1000.0 + fraction * spread.as_secs_f64() * 1000.0;
    Duration::from_millis(ms.round() as u64)
}
