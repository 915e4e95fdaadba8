//! Scripted transport for unit and integration tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{
    error::FetchError,
    fetch::{PreparedRequest, RawResponse, Transport},
};

/// [`Transport`] that replays a script of outcomes and records every request.
///
/// Scripted steps are consumed in order; once they run out the fallback set by
/// [`always`](Self::always) is used, and without one every send fails with a
/// transport error.
///
/// # Example
///
/// ```rust
/// use taskslot::testing::MockTransport;
///
/// let mock = MockTransport::new()
///     .respond(500, "")
///     .always(200, "[]");
/// assert_eq!(mock.calls(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<MockTransportInner>,
}

#[derive(Default)]
struct MockTransportInner {
    script: RwLock<VecDeque<Step>>,
    fallback: RwLock<Option<Step>>,
    latency: RwLock<Duration>,
    requests: RwLock<Vec<PreparedRequest>>,
}

#[derive(Clone, Debug)]
enum Step {
    Respond(RawResponse),
    Fail(String),
}

impl MockTransport {
    /// Creates an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one response.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Step::Respond(RawResponse::new(status, body)))
    }

    /// Queues one failure to obtain a response.
    pub fn fail(self, reason: impl Into<String>) -> Self {
        self.push(Step::Fail(reason.into()))
    }

    /// Response used once the queued steps are exhausted.
    pub fn always(self, status: u16, body: impl Into<String>) -> Self {
        *self.inner.fallback.write() = Some(Step::Respond(RawResponse::new(status, body)));
        self
    }

    /// Simulated time each send takes.
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.inner.latency.write() = latency;
        self
    }

    /// Number of sends so far.
    pub fn calls(&self) -> usize {
        self.inner.requests.read().len()
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.inner.requests.read().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<PreparedRequest> {
        self.inner.requests.read().last().cloned()
    }

    fn push(self, step: Step) -> Self {
        self.inner.script.write().push_back(step);
        self
    }

    fn next_step(&self) -> Option<Step> {
        if let Some(step) = self.inner.script.write().pop_front() {
            return Some(step);
        }
        self.inner.fallback.read().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse, FetchError> {
        self.inner.requests.write().push(request.clone());
        let step = self.next_step();

        let latency = *self.inner.latency.read();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(reason)) => Err(FetchError::transport(reason)),
            None => Err(FetchError::transport("no scripted response left")),
        }
    }
}
