//! # taskslot
//!
//! **Taskslot** keeps asynchronous results honest. It provides two building
//! blocks that are usually wired together:
//!
//! - a single-slot [`Controller`] that starts work on demand, refuses or
//!   supersedes overlapping requests, and never lets a late result overwrite a
//!   newer one;
//! - a [`FetchClient`] / [`RequestExecutor`] pair that sends HTTP requests with
//!   injected credentials, classifies failures and retries with a fixed delay or
//!   exponential backoff.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller ── resolve(args) ──► Controller (slot: value, resolving, counters, generation)
//!                                   │  gate → delay timer → generation check
//!                                   ▼
//!                               Task::invoke(args)
//!                                   │  (typically)
//!                                   ▼
//!                               FetchClient::fetch_json(spec)
//!                                   │  base URL + x-access-token + origin headers
//!                                   ▼
//!                               RequestExecutor (attempt → classify → retry)
//!                                   │
//!                                   ▼
//!                               Transport (HttpTransport | testing::MockTransport)
//!
//!  Controller ──┐                                  ┌──► LogWriter (tracing)
//!  Executor   ──┴─► Bus (broadcast) ─► SubscriberSet ──► custom Subscribe impls
//! ```
//!
//! ### Slot lifecycle
//! ```text
//! resolve ─► gate ─────────────────────────────────► Skipped(Gated)
//!              └─► generation g ─► delay ─► stale? ─► Skipped(Superseded | Canceled)
//!                                            └─► resolving = true ─► invoke
//!                                                   ├─ Ok,  g live  ─► Committed(v)
//!                                                   ├─ Ok,  g stale ─► Stale(v)
//!                                                   └─ Err          ─► rejected_count += 1
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                            |
//! |-------------------|--------------------------------------------------------------|-----------------------------------------------|
//! | **Controller**    | One slot of async work with generation-based staleness.      | [`Controller`], [`ControllerConfig`], [`Settled`] |
//! | **Tasks**         | Functions a controller invokes.                              | [`Task`], [`TaskFn`], [`TaskRef`]             |
//! | **Requests**      | Header injection, classification hook, retries.              | [`FetchClient`], [`RequestSpec`], [`Classify`] |
//! | **Policies**      | Retry count and delay rules.                                 | [`RetryPolicy`], [`RetryDelay`], [`BackoffPolicy`] |
//! | **Subscriber API**| Hook into slot and request events.                           | [`Subscribe`], [`SubscriberSet`], [`Bus`]     |
//! | **Errors**        | Typed request and setup errors.                              | [`FetchError`], [`SetupError`]                |
//! | **Configuration** | File/env client settings.                                    | [`ClientConfig`], [`load_config`]             |
//! | **Notes API**     | Typed calls of the notes service.                            | [`api::NotesApi`]                             |
//!
//! ## Optional features
//! - `http` (default): reqwest-backed [`HttpTransport`] and `FetchClient::from_config`.
//! - `logging` (default): exports the built-in [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskslot::{Controller, ControllerConfig, FetchClientBuilder, RequestSpec, RetryPolicy, Settled};
//! use taskslot::testing::MockTransport;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let transport = MockTransport::new().respond(503, "").respond(200, "[1, 2]");
//!     let client = FetchClientBuilder::new(transport)
//!         .with_base_url("http://api.local")
//!         .with_retry(RetryPolicy::new(1))
//!         .build();
//!
//!     let items = Controller::from_fn(
//!         "items",
//!         move |category: u64| {
//!             let client = client.clone();
//!             async move {
//!                 let spec = RequestSpec::get("/memo").with_query("category_id", category);
//!                 client.fetch_json::<Vec<u32>>(&spec).await
//!             }
//!         },
//!         ControllerConfig::default().with_delay(Duration::from_millis(10)),
//!     );
//!
//!     let settled = items.resolve(7).await.unwrap();
//!     assert_eq!(settled, Settled::Committed(vec![1, 2]));
//!     assert_eq!(items.resolved_count(), 1);
//! }
//! ```
mod config;
mod controller;
mod error;
mod events;
mod fetch;
mod policies;
mod subscribers;
mod tasks;

pub mod api;
pub mod telemetry;
pub mod testing;

// ---- Public re-exports ----

pub use config::{ClientConfig, load_config};
pub use controller::{
    Controller, ControllerConfig, Mounted, Resolution, Settled, SkipReason, SlotSnapshot,
};
pub use error::{FetchError, SetupError};
pub use events::{Bus, Event, EventKind};
pub use fetch::{
    Classify, Credentials, Escalate, FetchClient, FetchClientBuilder, Method, PreparedRequest,
    RawResponse, RequestExecutor, RequestSpec, SharedToken, Transport,
};
pub use policies::{BackoffPolicy, JitterPolicy, RetryDelay, RetryPolicy, RetrySettings};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{BoxTaskFuture, Task, TaskFn, TaskRef};

#[cfg(feature = "http")]
pub use fetch::HttpTransport;

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
