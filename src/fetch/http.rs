//! reqwest-backed [`Transport`].

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    error::{FetchError, SetupError},
    fetch::{
        request::Method,
        transport::{PreparedRequest, RawResponse, Transport},
    },
};

/// Production transport over a pooled [`reqwest::Client`].
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport; `timeout` bounds each attempt (`None` = no limit).
    pub fn new(timeout: Option<Duration>) -> Result<Self, SetupError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| SetupError::Client {
            reason: e.to_string(),
        })?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn method(m: Method) -> reqwest::Method {
    match m {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse, FetchError> {
        let mut builder = self.client.request(method(request.method), &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                FetchError::InvalidRequest {
                    reason: e.to_string(),
                }
            } else {
                FetchError::transport(e.to_string())
            }
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(format!("reading body: {e}")))?;

        Ok(RawResponse { status, body })
    }
}
