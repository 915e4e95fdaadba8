//! # Classification hook.
//!
//! A [`Classify`] hook sees every failed attempt before the default handler.
//! It either settles the chain itself (returning a value or a substitute error)
//! or calls [`Escalate::escalate`] to hand the failure to the default handler,
//! in which case its return value is ignored.
//!
//! ## Example
//! ```rust
//! use taskslot::{Escalate, FetchError};
//!
//! // Treat 404 as "no items", everything else goes to the default handler.
//! let hook = |err: &FetchError, escalate: &mut Escalate| -> Result<Vec<u32>, FetchError> {
//!     match err.status() {
//!         Some(404) => Ok(Vec::new()),
//!         _ => {
//!             escalate.escalate();
//!             Err(err.clone())
//!         }
//!     }
//! };
//! # let _ = hook;
//! ```

use crate::error::FetchError;

/// Handle a hook uses to defer to the default handler.
#[derive(Debug, Default)]
pub struct Escalate {
    requested: bool,
}

impl Escalate {
    /// Requests default handling for the current failure.
    pub fn escalate(&mut self) {
        self.requested = true;
    }

    /// Whether [`escalate`](Self::escalate) was called.
    pub fn is_requested(&self) -> bool {
        self.requested
    }
}

/// Caller-supplied override of failure handling.
pub trait Classify<R>: Send + Sync + 'static {
    /// Settles the chain or escalates.
    fn classify(&self, err: &FetchError, escalate: &mut Escalate) -> Result<R, FetchError>;
}

impl<R, F> Classify<R> for F
where
    F: Fn(&FetchError, &mut Escalate) -> Result<R, FetchError> + Send + Sync + 'static,
{
    fn classify(&self, err: &FetchError, escalate: &mut Escalate) -> Result<R, FetchError> {
        self(err, escalate)
    }
}
