//! # Outcome of one `resolve` call.
//!
//! A resolution either fails with the task's own error or settles with a
//! [`Settled`] value describing what happened to the slot:
//!
//! ```text
//! Created ─► gate ──────────────► Skipped(Gated)
//!              └─► Scheduled ─► timer ─► Skipped(Superseded | Canceled)
//!                                  └─► Resolving ─► Committed(v)   (generation current)
//!                                                └─► Stale(v)       (generation superseded)
//!                                                └─► Err(e)         (always counted)
//! ```

/// Why a resolution settled without invoking the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The slot was already resolving and concurrency is disabled.
    Gated,
    /// A newer `resolve` took over before the delay elapsed.
    Superseded,
    /// `cancel` or `reset` ran before the delay elapsed.
    Canceled,
}

impl SkipReason {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SkipReason::Gated => "gated",
            SkipReason::Superseded => "superseded",
            SkipReason::Canceled => "canceled",
        }
    }
}

/// Successful settlement of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T> {
    /// The task succeeded and its value was committed to the slot.
    Committed(T),
    /// The task succeeded after its generation was superseded; the slot was left untouched.
    Stale(T),
    /// The task was never invoked.
    Skipped(SkipReason),
}

impl<T> Settled<T> {
    /// The value produced by the task, committed or not.
    pub fn value(&self) -> Option<&T> {
        match self {
            Settled::Committed(v) | Settled::Stale(v) => Some(v),
            Settled::Skipped(_) => None,
        }
    }

    /// Consumes the settlement and returns the produced value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Settled::Committed(v) | Settled::Stale(v) => Some(v),
            Settled::Skipped(_) => None,
        }
    }

    /// `true` if the value was committed to the slot.
    pub fn is_committed(&self) -> bool {
        matches!(self, Settled::Committed(_))
    }

    /// `true` if the task was never invoked.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Settled::Skipped(_))
    }
}
