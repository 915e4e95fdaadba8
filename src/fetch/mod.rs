//! # Resilient request execution.
//!
//! - [`RequestSpec`] - caller-side descriptor (method, path, query, headers, JSON body)
//! - [`FetchClient`] - merges base URL and injected headers, dispatches executors
//! - [`RequestExecutor`] - one call chain: attempt, classify, retry
//! - [`Transport`] - one-attempt sender ([`HttpTransport`] with the `http` feature)
//! - [`Credentials`] / [`SharedToken`] - access-token injection
//! - [`Classify`] / [`Escalate`] - caller override of failure handling

mod builder;
mod classify;
mod client;
mod credentials;
mod executor;
#[cfg(feature = "http")]
mod http;
mod request;
mod transport;

pub use builder::FetchClientBuilder;
pub use classify::{Classify, Escalate};
pub use client::FetchClient;
pub use credentials::{Credentials, SharedToken};
pub use executor::RequestExecutor;
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use request::{Method, RequestSpec};
pub use transport::{PreparedRequest, RawResponse, Transport};
