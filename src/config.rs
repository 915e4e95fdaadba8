//! # Client configuration.
//!
//! Provides [`ClientConfig`], the settings a [`FetchClient`](crate::FetchClient)
//! is built from, and [`load_config`] to read them from a TOML file plus
//! `TASKSLOT__*` environment overrides (`__` separates nested keys).
//!
//! ## Sentinel values
//! - `timeout_ms = 0` → no per-attempt timeout
//! - `retry.retry_delay_ms` absent → exponential backoff between retries
//! - `retry.retry_delay_ms = 0` → retry immediately
//!
//! # Example
//! ```toml
//! base_url = "https://memo.example.com/api"
//! origin_url = "https://memo.example.com/app"
//! timeout_ms = 10000
//!
//! [retry]
//! retry_times = 2
//! retry_delay_ms = 500
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{
    error::SetupError,
    policies::{RetryPolicy, RetrySettings},
};

/// Settings for a request client.
///
/// ## Field semantics
/// - `base_url`: prefix joined with every relative request path (empty = paths are used as-is)
/// - `origin_url`: value of the `origin-url` header (`None` = header not sent)
/// - `timeout_ms`: per-attempt timeout of the HTTP transport (`0` = none)
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `retry`: default retry policy for requests that do not carry their own
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL for relative request paths.
    pub base_url: String,

    /// Request origin marker sent as `origin-url`.
    pub origin_url: Option<String>,

    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,

    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,

    /// Default retry policy.
    pub retry: RetrySettings,
}

impl ClientConfig {
    /// Returns the per-attempt timeout as an `Option`.
    ///
    /// - `None` → no timeout
    /// - `Some(d)` → each attempt is bounded by `d`
    #[inline]
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Default retry policy for requests.
    #[inline]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.into()
    }
}

impl Default for ClientConfig {
    /// Default configuration:
    ///
    /// - `base_url = ""`
    /// - `origin_url = None`
    /// - `timeout_ms = 0` (no timeout)
    /// - `bus_capacity = 1024`
    /// - `retry = { retry_times = 0 }` (no retries)
    fn default() -> Self {
        Self {
            base_url: String::new(),
            origin_url: None,
            timeout_ms: 0,
            bus_capacity: 1024,
            retry: RetrySettings {
                retry_times: 0,
                retry_delay_ms: Some(0),
            },
        }
    }
}

/// Loads a [`ClientConfig`].
///
/// 1. `path`, when given and present on disk (TOML)
/// 2. `TASKSLOT__*` environment variables on top (`TASKSLOT__RETRY__RETRY_TIMES=3`)
///
/// Keys missing from every source keep their [`Default`] values.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, SetupError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path.filter(|p| p.exists()) {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("TASKSLOT")
            .separator("__")
            .try_parsing(true),
    );

    let cfg = builder.build()?.try_deserialize()?;
    Ok(cfg)
}
