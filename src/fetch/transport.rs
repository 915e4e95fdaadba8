//! # Transport seam.
//!
//! A [`Transport`] performs exactly one attempt: it sends a fully prepared
//! request and reports the response status and body. Status classification,
//! retries and decoding belong to the [`RequestExecutor`](crate::RequestExecutor).
//!
//! ```text
//! RequestExecutor ──► Transport::send(&PreparedRequest)
//!                          ├─► Ok(RawResponse { status, body })   any status
//!                          └─► Err(FetchError::Transport)          no response
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{error::FetchError, fetch::request::Method};

/// Request with base URL, caller headers and injected headers merged.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    /// Absolute URL without the query string.
    pub url: String,
    pub query: Vec<(String, String)>,
    /// Header map keyed by lower-case name.
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
}

impl PreparedRequest {
    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// `METHOD url`, used as the event source.
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

/// Status and body of one response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for 2xx statuses.
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One-attempt request sender.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends `request` once.
    ///
    /// Any received response is `Ok`, whatever its status; failures to obtain a
    /// response are [`FetchError::Transport`].
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse, FetchError>;
}
