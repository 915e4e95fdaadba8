//! # FetchClient: request preparation and dispatch.
//!
//! The client owns what every call shares (base URL, origin marker, credentials,
//! default retry policy, transport, optional event bus) and turns each
//! [`RequestSpec`] into a [`PreparedRequest`] run by a [`RequestExecutor`].
//!
//! ## Header merge
//! Names are lower-cased, caller headers go first, then the injected ones
//! (which win on conflict whatever the caller's casing):
//! ```text
//! x-access-token                 credentials token, only when present
//! origin-url                     ClientConfig::origin_url, only when set
//! access-control-allow-origin    *
//! content-type                   application/json
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{
    error::FetchError,
    events::Bus,
    fetch::{
        credentials::Credentials,
        executor::RequestExecutor,
        request::RequestSpec,
        transport::{PreparedRequest, RawResponse, Transport},
    },
    policies::RetryPolicy,
};

pub(crate) const ACCESS_TOKEN_HEADER: &str = "x-access-token";
pub(crate) const ORIGIN_HEADER: &str = "origin-url";
const ALLOW_ORIGIN_HEADER: &str = "access-control-allow-origin";
const CONTENT_TYPE_HEADER: &str = "content-type";

/// Shared request client. Cheap to clone.
#[derive(Clone)]
pub struct FetchClient {
    inner: Arc<ClientInner>,
}

pub(super) struct ClientInner {
    pub base_url: String,
    pub origin_url: Option<String>,
    pub transport: Arc<dyn Transport>,
    pub credentials: Option<Arc<dyn Credentials>>,
    pub retry: RetryPolicy,
    pub bus: Option<Bus>,
}

impl FetchClient {
    pub(super) fn from_inner(inner: ClientInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Merges `spec` with the client's base URL and injected headers.
    pub fn prepare(&self, spec: &RequestSpec) -> PreparedRequest {
        let mut headers: BTreeMap<String, String> = spec
            .headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
            .collect();
        if let Some(token) = self
            .inner
            .credentials
            .as_ref()
            .and_then(|c| c.access_token())
        {
            headers.insert(ACCESS_TOKEN_HEADER.to_string(), token.to_string());
        }
        if let Some(origin) = &self.inner.origin_url {
            headers.insert(ORIGIN_HEADER.to_string(), origin.clone());
        }
        headers.insert(ALLOW_ORIGIN_HEADER.to_string(), "*".to_string());
        headers.insert(CONTENT_TYPE_HEADER.to_string(), "application/json".to_string());

        PreparedRequest {
            method: spec.method,
            url: join_url(&self.inner.base_url, &spec.path),
            query: spec.query.clone(),
            headers,
            body: spec.body.clone(),
        }
    }

    /// Executor for `spec` decoding the body as JSON, ready for a classification hook.
    pub fn executor<R: DeserializeOwned + 'static>(&self, spec: &RequestSpec) -> RequestExecutor<R> {
        let exec = RequestExecutor::json(
            Arc::clone(&self.inner.transport),
            self.prepare(spec),
            self.policy_for(spec),
        );
        self.attach_bus(exec)
    }

    /// Runs `spec` and decodes the 2xx body as JSON.
    pub async fn fetch_json<R: DeserializeOwned + 'static>(&self, spec: &RequestSpec) -> Result<R, FetchError> {
        self.executor(spec).run().await
    }

    /// Runs `spec` and returns the raw 2xx response.
    pub async fn fetch(&self, spec: &RequestSpec) -> Result<RawResponse, FetchError> {
        let exec = RequestExecutor::raw(
            Arc::clone(&self.inner.transport),
            self.prepare(spec),
            self.policy_for(spec),
        );
        self.attach_bus(exec).run().await
    }

    /// Default retry policy of the client.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.inner.retry
    }

    /// Event bus the client publishes to, if any.
    pub fn bus(&self) -> Option<&Bus> {
        self.inner.bus.as_ref()
    }

    fn policy_for(&self, spec: &RequestSpec) -> RetryPolicy {
        spec.retry.unwrap_or(self.inner.retry)
    }

    fn attach_bus<R: 'static>(&self, exec: RequestExecutor<R>) -> RequestExecutor<R> {
        match &self.inner.bus {
            Some(bus) => exec.with_bus(bus.clone()),
            None => exec,
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() || path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
