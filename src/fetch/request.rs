//! # Request descriptor.
//!
//! [`RequestSpec`] is what a caller hands to [`FetchClient`](crate::FetchClient):
//! a method, a path relative to the client's base URL, optional query pairs,
//! caller headers and an optional JSON body. The client turns it into a
//! [`PreparedRequest`](crate::PreparedRequest) before the first attempt.
//!
//! ## Example
//! ```rust
//! use taskslot::{Method, RequestSpec, RetryPolicy};
//!
//! let spec = RequestSpec::get("/memo")
//!     .with_query("category_id", 3)
//!     .with_retry(RetryPolicy::new(2));
//! assert_eq!(spec.method, Method::Get);
//! assert_eq!(spec.query, vec![("category_id".to_string(), "3".to_string())]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::{error::FetchError, policies::RetryPolicy};

/// HTTP method of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-side description of one logical call.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,
    /// Path appended to the client's base URL (absolute URLs are used as-is).
    pub path: String,
    /// Query pairs, in order.
    pub query: Vec<(String, String)>,
    /// Caller headers, keyed by lower-case name; injected headers take precedence.
    pub headers: BTreeMap<String, String>,
    /// JSON body.
    pub body: Option<serde_json::Value>,
    /// Per-call retry policy (`None` = the client's default).
    pub retry: Option<RetryPolicy>,
}

impl RequestSpec {
    /// Creates a descriptor without query, headers or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
            retry: None,
        }
    }

    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// `POST path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// `PUT path`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// `DELETE path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Appends a query pair.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Sets a caller header. Names are case-insensitive and stored lower-case.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Serializes `body` as the JSON payload.
    ///
    /// Fails with [`FetchError::InvalidRequest`] if `body` cannot be serialized.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, FetchError> {
        let value = serde_json::to_value(body).map_err(|e| FetchError::InvalidRequest {
            reason: format!("body serialization failed: {e}"),
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Overrides the client's retry policy for this call.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }
}
