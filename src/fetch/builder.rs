use std::sync::Arc;

use crate::{
    config::ClientConfig,
    events::Bus,
    fetch::{
        client::{ClientInner, FetchClient},
        credentials::Credentials,
        transport::Transport,
    },
    policies::RetryPolicy,
};

/// Builder for constructing a [`FetchClient`] with optional features.
pub struct FetchClientBuilder {
    transport: Arc<dyn Transport>,
    base_url: String,
    origin_url: Option<String>,
    credentials: Option<Arc<dyn Credentials>>,
    retry: RetryPolicy,
    bus: Option<Bus>,
}

impl FetchClientBuilder {
    /// Creates a builder sending through `transport`, with no base URL, no
    /// credentials and no retries.
    pub fn new(transport: impl Transport) -> Self {
        Self::with_shared_transport(Arc::new(transport))
    }

    /// Creates a builder around an already shared transport.
    pub fn with_shared_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: String::new(),
            origin_url: None,
            credentials: None,
            retry: RetryPolicy::default(),
            bus: None,
        }
    }

    /// Applies base URL, origin marker and default retry policy from `cfg`.
    pub fn with_config(mut self, cfg: &ClientConfig) -> Self {
        self.base_url = cfg.base_url.clone();
        self.origin_url = cfg.origin_url.clone();
        self.retry = cfg.retry_policy();
        self
    }

    /// Sets the base URL joined with relative request paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the value of the `origin-url` header.
    pub fn with_origin_url(mut self, origin_url: impl Into<String>) -> Self {
        self.origin_url = Some(origin_url.into());
        self
    }

    /// Sets the access-token provider.
    pub fn with_credentials(mut self, credentials: impl Credentials) -> Self {
        self.credentials = Some(Arc::new(credentials));
        self
    }

    /// Sets the retry policy used when a request carries none.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Publishes request events to `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Builds the client.
    pub fn build(self) -> FetchClient {
        FetchClient::from_inner(ClientInner {
            base_url: self.base_url,
            origin_url: self.origin_url,
            transport: self.transport,
            credentials: self.credentials,
            retry: self.retry,
            bus: self.bus,
        })
    }
}

#[cfg(feature = "http")]
impl FetchClient {
    /// Builds a client over [`HttpTransport`](crate::HttpTransport) from `cfg`.
    pub fn from_config(
        cfg: &ClientConfig,
        credentials: impl Credentials,
    ) -> Result<Self, crate::error::SetupError> {
        let transport = crate::fetch::http::HttpTransport::new(cfg.request_timeout())?;
        Ok(FetchClientBuilder::new(transport)
            .with_config(cfg)
            .with_credentials(credentials)
            .build())
    }
}
