//! # Mount guard.
//!
//! [`Mounted`] ties a controller to an owning scope. Dropping the guard is the
//! "unmount" step: with `resolve_on_mounted` it cancels the slot, which skips a
//! still-scheduled resolution and releases the gate of an in-flight one.

use super::core::Controller;

/// Guard returned by [`Controller::mount`].
#[must_use = "dropping the guard unmounts the controller"]
pub struct Mounted<A, T, E> {
    controller: Controller<A, T, E>,
    cancel_on_drop: bool,
}

impl<A, T, E> Mounted<A, T, E> {
    pub(super) fn new(controller: Controller<A, T, E>, cancel_on_drop: bool) -> Self {
        Self {
            controller,
            cancel_on_drop,
        }
    }

    /// The mounted controller.
    pub fn controller(&self) -> &Controller<A, T, E> {
        &self.controller
    }
}

impl<A, T, E> Drop for Mounted<A, T, E> {
    fn drop(&mut self) {
        if self.cancel_on_drop {
            self.controller.cancel(false);
        }
    }
}
