//! # LogWriter: events rendered through `tracing`
//!
//! A subscriber that turns every [`Event`] into one `tracing` record under the
//! `taskslot::events` target. Failures log at `warn`, retries and lifecycle at
//! `debug`/`info`.
//!
//! ## Example output (fmt layer)
//! ```text
//! DEBUG taskslot::events: [resolve-started] slot="memos" generation=3
//! WARN  taskslot::events: [request-failed] source="GET /memo/7" attempt=1 status=503 err="server error: HTTP 503"
//! INFO  taskslot::events: [retry-scheduled] source="GET /memo/7" delay_ms=0 after_attempt=1
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let source = e.source.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::ResolveGated => {
                tracing::debug!(target: "taskslot::events", "[resolve-gated] slot={source:?}");
            }
            EventKind::ResolveScheduled => {
                tracing::debug!(
                    target: "taskslot::events",
                    "[resolve-scheduled] slot={source:?} generation={:?} delay_ms={:?}",
                    e.generation, e.delay_ms
                );
            }
            EventKind::ResolveStarted => {
                tracing::debug!(
                    target: "taskslot::events",
                    "[resolve-started] slot={source:?} generation={:?}",
                    e.generation
                );
            }
            EventKind::ResolveCommitted => {
                tracing::info!(
                    target: "taskslot::events",
                    "[resolve-committed] slot={source:?} generation={:?}",
                    e.generation
                );
            }
            EventKind::ResolveDiscarded => {
                tracing::debug!(
                    target: "taskslot::events",
                    "[resolve-discarded] slot={source:?} generation={:?} (stale)",
                    e.generation
                );
            }
            EventKind::ResolveSkipped => {
                tracing::debug!(
                    target: "taskslot::events",
                    "[resolve-skipped] slot={source:?} generation={:?} reason={reason:?}",
                    e.generation
                );
            }
            EventKind::ResolveRejected => {
                tracing::warn!(
                    target: "taskslot::events",
                    "[resolve-rejected] slot={source:?} generation={:?} err={reason:?}",
                    e.generation
                );
            }
            EventKind::SlotCanceled => {
                tracing::debug!(target: "taskslot::events", "[slot-canceled] slot={source:?}");
            }
            EventKind::SlotReset => {
                tracing::debug!(target: "taskslot::events", "[slot-reset] slot={source:?}");
            }
            EventKind::RequestStarting => {
                tracing::debug!(
                    target: "taskslot::events",
                    "[request-starting] source={source:?} attempt={:?}",
                    e.attempt
                );
            }
            EventKind::RequestSucceeded => {
                tracing::debug!(
                    target: "taskslot::events",
                    "[request-succeeded] source={source:?} attempt={:?} status={:?}",
                    e.attempt, e.status
                );
            }
            EventKind::RequestFailed => {
                tracing::warn!(
                    target: "taskslot::events",
                    "[request-failed] source={source:?} attempt={:?} status={:?} err={reason:?}",
                    e.attempt, e.status
                );
            }
            EventKind::RetryScheduled => {
                tracing::info!(
                    target: "taskslot::events",
                    "[retry-scheduled] source={source:?} delay_ms={:?} after_attempt={:?}",
                    e.delay_ms, e.attempt
                );
            }
            EventKind::RetriesExhausted => {
                tracing::warn!(
                    target: "taskslot::events",
                    "[retries-exhausted] source={source:?} attempts={:?} err={reason:?}",
                    e.attempt
                );
            }
            EventKind::ClassifierOverride => {
                tracing::info!(
                    target: "taskslot::events",
                    "[classifier-override] source={source:?} attempt={:?} err={reason:?}",
                    e.attempt
                );
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(
                    target: "taskslot::events",
                    "[subscriber-overflow] subscriber={source:?} reason={reason:?}"
                );
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(
                    target: "taskslot::events",
                    "[subscriber-panicked] subscriber={source:?} info={reason:?}"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
