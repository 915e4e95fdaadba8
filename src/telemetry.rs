//! Tracing setup for binaries and tests.
//!
//! The library only emits through `tracing`; installing a subscriber is left to
//! the application. [`init_tracing`] is the stock choice: a fmt layer filtered by
//! `RUST_LOG`, falling back to `default_directives` when it is unset or invalid.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a global fmt subscriber.
///
/// Returns `false` if a global subscriber was already installed.
///
/// ```rust
/// taskslot::telemetry::init_tracing("info,taskslot::events=debug");
/// ```
pub fn init_tracing(default_directives: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
