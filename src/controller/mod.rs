//! # Controller: one slot of asynchronous work.
//!
//! A [`Controller`] wraps a [`Task`](crate::Task) and owns a single result slot.
//! Each `resolve` starts a new **generation**; only the live generation may
//! commit a value, so a slow response can never overwrite a newer one.
//!
//! ```text
//! resolve(args) ─► gate (no_concurrency && resolving?) ─► Skipped(Gated)
//!       │
//!       ▼ generation += 1, old delay timer fired
//!  delay timer ──(newer resolve / cancel / reset)──► Skipped(Superseded | Canceled)
//!       │
//!       ▼ resolving = true
//!  task.invoke(args)
//!       ├─ Ok(v), generation live   ─► value = v, resolved_count += 1, Committed(v)
//!       ├─ Ok(v), generation stale  ─► slot untouched, Stale(v)
//!       └─ Err(e)                   ─► rejected_count += 1, resolving = false, Err(e)
//! ```
//!
//! ## Rules
//! - Failures are counted even when their generation is stale; only a `reset`
//!   makes older failures irrelevant.
//! - `set_value` / `update_value` do not touch generations or counters.
//! - The slot lock is never held across an `.await`.
//! - `resolve` spawns its operation on the current tokio runtime; the returned
//!   [`Resolution`] only observes it, so dropping it does not stop the work.

mod config;
mod core;
mod mount;
mod settled;
mod slot;

pub use config::ControllerConfig;
pub use core::{Controller, Resolution};
pub use mount::Mounted;
pub use settled::{Settled, SkipReason};
pub use slot::SlotSnapshot;
