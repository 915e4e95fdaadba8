//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and
//! the built-in [`LogWriter`] (feature `logging`).
//!
//! ## Architecture
//! ```text
//! Controller / RequestExecutor ── publish(Event) ──► Bus
//!                                                     │
//!                                  SubscriberSet::spawn_listener
//!                                                     │
//!                                    ┌────────────────┼────────────────┐
//!                                    ▼                ▼                ▼
//!                                LogWriter         Metrics          Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
