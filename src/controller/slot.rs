use tokio_util::sync::CancellationToken;

use super::settled::SkipReason;

/// Mutable state of one slot (guarded by the controller's mutex).
pub(super) struct SlotState<T> {
    /// Last committed (or directly set) value.
    pub value: Option<T>,
    /// Value restored by `reset` / `reset_at_resolve`.
    pub initial: Option<T>,
    /// True between "invocation started" and "settled or canceled".
    pub resolving: bool,
    pub resolved_count: u64,
    pub rejected_count: u64,
    /// Live generation; advanced by resolve, cancel and reset.
    pub generation: u64,
    /// Generation produced by the most recent `cancel`/`reset`.
    pub canceled_at: u64,
    /// Generation produced by the most recent `reset`; older failures are not counted.
    pub reset_at: u64,
    /// Delay timer of the scheduled generation, if any.
    pub pending_timer: Option<CancellationToken>,
}

impl<T: Clone> SlotState<T> {
    pub fn new(initial: Option<T>) -> Self {
        Self {
            value: initial.clone(),
            initial,
            resolving: false,
            resolved_count: 0,
            rejected_count: 0,
            generation: 0,
            canceled_at: 0,
            reset_at: 0,
            pending_timer: None,
        }
    }
}

impl<T> SlotState<T> {
    /// Moves to a new generation and fires any pending delay timer.
    pub fn advance(&mut self) -> u64 {
        self.generation += 1;
        if let Some(timer) = self.pending_timer.take() {
            timer.cancel();
        }
        self.generation
    }

    #[inline]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Why `generation` lost its turn before invocation.
    pub fn skip_reason(&self, generation: u64) -> SkipReason {
        if self.canceled_at > generation {
            SkipReason::Canceled
        } else {
            SkipReason::Superseded
        }
    }

    pub fn snapshot(&self) -> SlotSnapshot<T>
    where
        T: Clone,
    {
        SlotSnapshot {
            value: self.value.clone(),
            resolving: self.resolving,
            resolved_count: self.resolved_count,
            rejected_count: self.rejected_count,
            generation: self.generation,
        }
    }
}

/// Point-in-time copy of a slot's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSnapshot<T> {
    /// Last committed (or directly set) value.
    pub value: Option<T>,
    /// Whether an invocation is in flight for the live generation.
    pub resolving: bool,
    /// Committed successes since creation or the last reset.
    pub resolved_count: u64,
    /// Counted failures since creation or the last reset.
    pub rejected_count: u64,
    /// Live generation.
    pub generation: u64,
}
