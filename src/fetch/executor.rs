//! # RequestExecutor: one logical call with retries.
//!
//! Drives a single [`PreparedRequest`] through a [`Transport`] until it succeeds,
//! a failure is final, or the [`RetryPolicy`] runs out.
//!
//! ## Event flow
//! ```text
//! RequestStarting → [send] → RequestSucceeded (2xx, decoded)
//!                          → RequestFailed
//!                               ├─► ClassifierOverride   (hook settled the chain)
//!                               ├─► RetryScheduled → [sleep] → (next attempt)
//!                               └─► RetriesExhausted
//! ```
//!
//! ## Architecture
//! ```text
//! loop {
//!   ├─► attempt() ──► transport.send() ──► 2xx? decode : FetchError::from_status
//!   ├─► Ok  → return
//!   ├─► hook configured?
//!   │     ├─► settled   → return hook result
//!   │     └─► escalated → default handler
//!   └─► default handler
//!         ├─► not retryable (4xx, decode, ...) → return error as-is
//!         ├─► retry_times == 0                → return error as-is
//!         ├─► tried >= retry_times            → Exhausted { attempts, last }
//!         └─► tried += 1, sleep(retry_delay.delay_for(tried))
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; the same prepared request is re-sent
//! - `tried` counts consumed retries and only grows on retryable failures
//! - A 4xx response is **never** retried

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::{
    error::FetchError,
    events::{self, Bus, Event, EventKind},
    fetch::{
        classify::{Classify, Escalate},
        transport::{PreparedRequest, RawResponse, Transport},
    },
    policies::RetryPolicy,
};

type Decoder<R> = fn(RawResponse) -> Result<R, FetchError>;

/// Executes one call chain (first attempt plus retries).
pub struct RequestExecutor<R: 'static> {
    transport: Arc<dyn Transport>,
    request: PreparedRequest,
    policy: RetryPolicy,
    decode: Decoder<R>,
    classifier: Option<Arc<dyn Classify<R>>>,
    bus: Option<Bus>,
    label: Arc<str>,
    tried: u32,
}

impl<R: DeserializeOwned + 'static> RequestExecutor<R> {
    /// Executor that decodes 2xx bodies as JSON.
    ///
    /// An empty body decodes as JSON `null`, so `()` and `Option<_>` accept it.
    pub fn json(transport: Arc<dyn Transport>, request: PreparedRequest, policy: RetryPolicy) -> Self {
        Self::with_decoder(transport, request, policy, decode_json::<R>)
    }
}

impl RequestExecutor<RawResponse> {
    /// Executor that returns the raw 2xx response.
    pub fn raw(transport: Arc<dyn Transport>, request: PreparedRequest, policy: RetryPolicy) -> Self {
        Self::with_decoder(transport, request, policy, Ok)
    }
}

impl<R: 'static> RequestExecutor<R> {
    fn with_decoder(
        transport: Arc<dyn Transport>,
        request: PreparedRequest,
        policy: RetryPolicy,
        decode: Decoder<R>,
    ) -> Self {
        let label = Arc::from(request.label());
        Self {
            transport,
            request,
            policy,
            decode,
            classifier: None,
            bus: None,
            label,
            tried: 0,
        }
    }

    /// Installs a classification hook consulted on every failed attempt.
    pub fn with_classifier(mut self, hook: impl Classify<R>) -> Self {
        self.classifier = Some(Arc::new(hook));
        self
    }

    /// Installs a shared classification hook.
    pub fn with_shared_classifier(mut self, hook: Arc<dyn Classify<R>>) -> Self {
        self.classifier = Some(hook);
        self
    }

    /// Publishes attempt events to `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// The request every attempt sends.
    pub fn request(&self) -> &PreparedRequest {
        &self.request
    }

    /// Runs the chain to completion.
    pub async fn run(mut self) -> Result<R, FetchError> {
        loop {
            let attempt = self.tried + 1;
            self.emit(|| Event::new(EventKind::RequestStarting).with_attempt(attempt));

            let err = match self.attempt().await {
                Ok((status, value)) => {
                    self.emit(|| {
                        Event::new(EventKind::RequestSucceeded)
                            .with_attempt(attempt)
                            .with_status(Some(status))
                    });
                    return Ok(value);
                }
                Err(err) => err,
            };
            self.emit(|| {
                Event::new(EventKind::RequestFailed)
                    .with_attempt(attempt)
                    .with_status(err.status())
                    .with_reason(err.as_message())
            });

            if let Some(hook) = &self.classifier {
                let mut escalate = Escalate::default();
                let settled = hook.classify(&err, &mut escalate);
                if !escalate.is_requested() {
                    self.emit(|| {
                        Event::new(EventKind::ClassifierOverride)
                            .with_attempt(attempt)
                            .with_reason(match &settled {
                                Ok(_) => "value".to_string(),
                                Err(e) => e.as_message(),
                            })
                    });
                    return settled;
                }
            }

            let delay = self.default_handler(err)?;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    async fn attempt(&self) -> Result<(u16, R), FetchError> {
        let response = self.transport.send(&self.request).await?;
        if !response.is_success() {
            return Err(FetchError::from_status(response.status, response.body));
        }
        let status = response.status;
        (self.decode)(response).map(|value| (status, value))
    }

    /// Returns the wait before the next attempt, or the final error.
    fn default_handler(&mut self, err: FetchError) -> Result<Duration, FetchError> {
        if !err.is_retryable() || self.policy.retry_times == 0 {
            return Err(err);
        }
        let attempt = self.tried + 1;
        if self.tried >= self.policy.retry_times {
            self.emit(|| {
                Event::new(EventKind::RetriesExhausted)
                    .with_attempt(attempt)
                    .with_reason(err.as_message())
            });
            return Err(FetchError::Exhausted {
                attempts: attempt,
                last: Box::new(err),
            });
        }

        self.tried += 1;
        let delay = self.policy.retry_delay.delay_for(self.tried);
        self.emit(|| {
            Event::new(EventKind::RetryScheduled)
                .with_attempt(attempt)
                .with_delay(delay)
                .with_reason(err.as_message())
        });
        Ok(delay)
    }

    fn emit(&self, ev: impl FnOnce() -> Event) {
        events::emit(self.bus.as_ref(), || ev().with_source(Arc::clone(&self.label)));
    }
}

fn decode_json<R: DeserializeOwned>(response: RawResponse) -> Result<R, FetchError> {
    let body = response.body.trim();
    let body = if body.is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| FetchError::Decode {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fetch::request::Method,
        policies::{BackoffPolicy, JitterPolicy, RetryDelay},
        testing::MockTransport,
    };
    use std::collections::BTreeMap;

    fn request() -> PreparedRequest {
        PreparedRequest {
            method: Method::Get,
            url: "http://api.test/items".to_string(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    fn executor(mock: &MockTransport, policy: RetryPolicy) -> RequestExecutor<Vec<u32>> {
        RequestExecutor::json(Arc::new(mock.clone()), request(), policy)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_decodes_json() {
        let mock = MockTransport::new().respond(200, "[1,2,3]");

        let items = executor(&mock, RetryPolicy::none()).run().await.unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhaust_after_retry_times_plus_one_attempts() {
        let mock = MockTransport::new().always(503, "down");

        let err = executor(&mock, RetryPolicy::new(2)).run().await.unwrap_err();

        assert_eq!(mock.calls(), 3);
        match err {
            FetchError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert_eq!(*last, FetchError::from_status(503, "down"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retries_surfaces_the_failure_unwrapped() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let mock = MockTransport::new().always(503, "down");

        let err = executor(&mock, RetryPolicy::none())
            .with_bus(bus)
            .run()
            .await
            .unwrap_err();

        assert_eq!(mock.calls(), 1);
        assert_eq!(err, FetchError::from_status(503, "down"));
        while let Ok(ev) = rx.try_recv() {
            assert_ne!(ev.kind, EventKind::RetriesExhausted);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_is_not_retried() {
        let mock = MockTransport::new().always(404, "missing");

        let err = executor(&mock, RetryPolicy::new(5)).run().await.unwrap_err();

        assert_eq!(mock.calls(), 1);
        assert_eq!(err, FetchError::from_status(404, "missing"));
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let mock = MockTransport::new()
            .fail("connection reset")
            .respond(500, "")
            .respond(200, "[7]");

        let items = executor(&mock, RetryPolicy::new(3)).run().await.unwrap();

        assert_eq!(items, vec![7]);
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_between_attempts() {
        let mock = MockTransport::new().always(502, "");
        let policy = RetryPolicy::new(2).with_delay(RetryDelay::Fixed(Duration::from_millis(250)));
        let started = tokio::time::Instant::now();

        let _ = executor(&mock, policy).run().await;

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(500) && elapsed < Duration::from_millis(510));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_retries_immediately() {
        let mock = MockTransport::new().always(500, "");
        let started = tokio::time::Instant::now();

        let _ = executor(&mock, RetryPolicy::new(3)).run().await;

        assert_eq!(mock.calls(), 4);
        assert!(started.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_delay_grows_by_powers_of_three() {
        let mock = MockTransport::new().always(500, "");
        let backoff = BackoffPolicy {
            jitter: JitterPolicy::None,
            ..BackoffPolicy::exponential()
        };
        let policy = RetryPolicy::new(2).with_delay(RetryDelay::Backoff(backoff));
        let started = tokio::time::Instant::now();

        let _ = executor(&mock, policy).run().await;

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(36) && elapsed < Duration::from_millis(36_010));
    }

    #[tokio::test(start_paused = true)]
    async fn test_decode_failure_is_final() {
        let mock = MockTransport::new().always(200, "not json");

        let err = executor(&mock, RetryPolicy::new(3)).run().await.unwrap_err();

        assert_eq!(err.as_label(), "fetch_decode_error");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_classifier_substitutes_value() {
        let mock = MockTransport::new().always(404, "");
        let exec = executor(&mock, RetryPolicy::new(3)).with_classifier(
            |err: &FetchError, escalate: &mut Escalate| {
                if err.status() == Some(404) {
                    Ok(Vec::new())
                } else {
                    escalate.escalate();
                    Err(err.clone())
                }
            },
        );

        assert_eq!(exec.run().await.unwrap(), Vec::<u32>::new());
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_classifier_custom_error_stops_retries() {
        let mock = MockTransport::new().always(503, "");
        let exec = executor(&mock, RetryPolicy::new(3))
            .with_classifier(|_: &FetchError, _: &mut Escalate| Err(FetchError::custom("maintenance")));

        let err = exec.run().await.unwrap_err();

        assert_eq!(err, FetchError::custom("maintenance"));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_escalating_classifier_keeps_default_handling() {
        let mock = MockTransport::new().always(503, "");
        let exec = executor(&mock, RetryPolicy::new(1)).with_classifier(
            |err: &FetchError, escalate: &mut Escalate| {
                escalate.escalate();
                Ok(vec![err.status().map(u32::from).unwrap_or_default()])
            },
        );

        let err = exec.run().await.unwrap_err();

        assert_eq!(err.as_label(), "fetch_exhausted");
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_raw_executor_accepts_empty_body() {
        let mock = MockTransport::new().respond(204, "");

        let resp = RequestExecutor::raw(Arc::new(mock.clone()), request(), RetryPolicy::none())
            .run()
            .await
            .unwrap();

        assert_eq!(resp, RawResponse::new(204, ""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_for_a_retried_chain() {
        let bus = Bus::new(32);
        let mut rx = bus.subscribe();
        let mock = MockTransport::new().respond(500, "").respond(200, "[]");

        executor(&mock, RetryPolicy::new(1)).with_bus(bus).run().await.unwrap();

        let mut seen = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            assert_eq!(ev.source.as_deref(), Some("GET http://api.test/items"));
            seen.push((ev.kind, ev.attempt));
        }
        assert_eq!(
            seen,
            vec![
                (EventKind::RequestStarting, Some(1)),
                (EventKind::RequestFailed, Some(1)),
                (EventKind::RetryScheduled, Some(1)),
                (EventKind::RequestStarting, Some(2)),
                (EventKind::RequestSucceeded, Some(2)),
            ]
        );
    }
}
