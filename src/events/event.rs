//! # Events emitted by slot controllers and request executors.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Slot events**: the controller's per-generation state machine
//!   (gated, scheduled, started, committed, discarded, skipped, rejected, canceled, reset)
//! - **Request events**: the executor's attempt/retry loop
//! - **Subscriber events**: delivery problems inside the fan-out
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! source name, generation, attempt number, status code and delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskslot::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::RetryScheduled)
//!     .with_source("GET /memo")
//!     .with_attempt(2)
//!     .with_delay(Duration::from_millis(250))
//!     .with_reason("server error: HTTP 503");
//!
//! assert_eq!(ev.kind, EventKind::RetryScheduled);
//! assert_eq!(ev.source.as_deref(), Some("GET /memo"));
//! assert_eq!(ev.delay_ms, Some(250));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Slot events ===
    /// `resolve` refused because the slot is already resolving.
    ///
    /// Sets: `source`
    ResolveGated,

    /// `resolve` accepted; invocation waits for the configured delay.
    ///
    /// Sets: `source`, `generation`, `delay_ms`
    ResolveScheduled,

    /// The supplied function is being invoked.
    ///
    /// Sets: `source`, `generation`
    ResolveStarted,

    /// A current generation succeeded and its value was committed.
    ///
    /// Sets: `source`, `generation`
    ResolveCommitted,

    /// A stale generation succeeded; its value was not committed.
    ///
    /// Sets: `source`, `generation`
    ResolveDiscarded,

    /// A scheduled generation was superseded or canceled before invocation.
    ///
    /// Sets: `source`, `generation`, `reason`
    ResolveSkipped,

    /// The supplied function failed (regardless of generation currency).
    ///
    /// Sets: `source`, `generation`, `reason`
    ResolveRejected,

    /// The slot was canceled.
    ///
    /// Sets: `source`, `generation` (the new live generation)
    SlotCanceled,

    /// The slot was reset to its initial state.
    ///
    /// Sets: `source`, `generation`
    SlotReset,

    // === Request events ===
    /// An attempt is about to be dispatched.
    ///
    /// Sets: `source` (`METHOD url`), `attempt` (1-based)
    RequestStarting,

    /// An attempt returned a 2xx response.
    ///
    /// Sets: `source`, `attempt`, `status`
    RequestSucceeded,

    /// An attempt failed.
    ///
    /// Sets: `source`, `attempt`, `status` (if any), `reason`
    RequestFailed,

    /// A retry was scheduled after a retryable failure.
    ///
    /// Sets: `source`, `attempt` (the failed one), `delay_ms`, `reason`
    RetryScheduled,

    /// The retry policy ran out; the chain failed.
    ///
    /// Sets: `source`, `attempt`, `reason`
    RetriesExhausted,

    /// A classification hook settled the failure without escalating.
    ///
    /// Sets: `source`, `attempt`, `reason`
    ClassifierOverride,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `source` (subscriber name), `reason` (panic message)
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `source` (subscriber name), `reason`
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Controller name, request label or subscriber name.
    pub source: Option<Arc<str>>,
    /// Slot generation the event refers to.
    pub generation: Option<u64>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// HTTP status code, if the event concerns a response.
    pub status: Option<u16>,
    /// Human-readable reason (errors, skip causes, overflow details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            source: None,
            generation: None,
            attempt: None,
            delay_ms: None,
            status: None,
            reason: None,
        }
    }

    /// Attaches the emitting source's name.
    #[inline]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches a slot generation.
    #[inline]
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches an HTTP status, if any.
    #[inline]
    pub fn with_status(mut self, status: Option<u16>) -> Self {
        self.status = status;
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_source(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_source(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::ResolveStarted);
        let b = Event::new(EventKind::ResolveCommitted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_delay_saturates_at_u32() {
        let ev = Event::new(EventKind::RetryScheduled).with_delay(Duration::from_secs(u64::MAX / 4));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }
}
