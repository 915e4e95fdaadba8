//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by slot controllers and request executors.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Controller` (slot state machine), `RequestExecutor`
//!   (attempts and retries), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: `SubscriberSet::spawn_listener` (fans out to user subscribers) or any
//!   receiver obtained from [`Bus::subscribe`].
//!
//! Publishing is optional everywhere: components without a bus emit nothing.

mod bus;
mod event;

pub(crate) use bus::emit;
pub use bus::Bus;
pub use event::{Event, EventKind};
