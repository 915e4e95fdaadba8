//! Retry and backoff policies.
//!
//! This module groups the knobs that control **whether** a failed request is
//! attempted again and **how long** to wait between attempts.
//!
//! ## Contents
//! - [`RetryPolicy`]   how many retries a request chain may make, and its [`RetryDelay`] rule
//! - [`BackoffPolicy`] how computed delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization strategy to avoid synchronized retries
//!
//! ## Quick wiring
//! ```text
//! RequestSpec { retry: Option<RetryPolicy>, .. }
//!      └─► fetch::RequestExecutor uses:
//!           - retry.retry_times to decide retry/exhausted
//!           - retry.retry_delay.delay_for(tried) to schedule the next attempt
//! ```
//!
//! ## Defaults
//! - `RetryPolicy::default()` → no retries, `RetryDelay::Fixed(0)`.
//! - `BackoffPolicy::default()` → [`BackoffPolicy::exponential`] (3^(k+1)s + up to 1s jitter).
//! - `JitterPolicy::None`.

mod backoff;
mod jitter;
mod retry;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use retry::{RetryDelay, RetryPolicy, RetrySettings};
