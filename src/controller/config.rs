//! # Controller configuration.
//!
//! [`ControllerConfig`] mirrors the knobs a slot owner can set at construction.
//!
//! ## Sentinel values
//! - `delay = 0s` → invoke right away, without a timer
//! - `initial_value = None` → the slot starts (and resets) empty

use std::time::Duration;

/// Configuration for a [`Controller`](crate::Controller).
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use taskslot::ControllerConfig;
///
/// let cfg = ControllerConfig::<Vec<String>>::default()
///     .with_delay(Duration::from_millis(300))
///     .with_initial_value(Vec::new());
/// assert!(cfg.no_concurrency);
/// ```
#[derive(Clone, Debug)]
pub struct ControllerConfig<T> {
    /// Wait before invoking the task; a newer `resolve` or `cancel` during the wait
    /// skips the invocation.
    pub delay: Duration,

    /// Refuse new resolutions while one is resolving.
    pub no_concurrency: bool,

    /// Resolve once (with `A::default()`) when mounted, cancel when unmounted.
    pub resolve_on_mounted: bool,

    /// Reset the value to `initial_value` when an invocation starts.
    pub reset_at_resolve: bool,

    /// Value the slot starts with and returns to on `reset`.
    pub initial_value: Option<T>,
}

impl<T> Default for ControllerConfig<T> {
    /// Default configuration:
    ///
    /// - `delay = 0s`
    /// - `no_concurrency = true`
    /// - `resolve_on_mounted = false`
    /// - `reset_at_resolve = false`
    /// - `initial_value = None`
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            no_concurrency: true,
            resolve_on_mounted: false,
            reset_at_resolve: false,
            initial_value: None,
        }
    }
}

impl<T> ControllerConfig<T> {
    /// Returns a new config with the given pre-invocation delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns a new config with the concurrency gate toggled.
    pub fn with_no_concurrency(mut self, no_concurrency: bool) -> Self {
        self.no_concurrency = no_concurrency;
        self
    }

    /// Returns a new config with mount-time resolution toggled.
    pub fn with_resolve_on_mounted(mut self, resolve_on_mounted: bool) -> Self {
        self.resolve_on_mounted = resolve_on_mounted;
        self
    }

    /// Returns a new config with reset-at-resolve toggled.
    pub fn with_reset_at_resolve(mut self, reset_at_resolve: bool) -> Self {
        self.reset_at_resolve = reset_at_resolve;
        self
    }

    /// Returns a new config with the given initial value.
    pub fn with_initial_value(mut self, value: T) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Splits off the `Copy` part kept outside the state lock.
    pub(super) fn split(self) -> (SlotOptions, Option<T>) {
        let options = SlotOptions {
            delay: self.delay,
            no_concurrency: self.no_concurrency,
            resolve_on_mounted: self.resolve_on_mounted,
            reset_at_resolve: self.reset_at_resolve,
        };
        (options, self.initial_value)
    }
}

/// Immutable per-controller options.
#[derive(Clone, Copy, Debug)]
pub(super) struct SlotOptions {
    pub delay: Duration,
    pub no_concurrency: bool,
    pub resolve_on_mounted: bool,
    pub reset_at_resolve: bool,
}
