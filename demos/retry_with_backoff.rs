//! # Example: retry_with_backoff
//!
//! A request that fails twice with 503 before succeeding. The client retries
//! with a short exponential backoff; the last call hits a 404, which is never
//! retried, and a classification hook maps it to an empty list.
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example retry_with_backoff
//! ```

use std::sync::Arc;
use std::time::Duration;

use taskslot::testing::MockTransport;
use taskslot::{
    BackoffPolicy, Bus, Escalate, FetchClientBuilder, FetchError, JitterPolicy, LogWriter,
    RequestSpec, RetryDelay, RetryPolicy, Subscribe, SubscriberSet, telemetry,
};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing("info,taskslot::events=debug");

    let bus = Bus::new(256);
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let stop = CancellationToken::new();
    let listener = SubscriberSet::new(subs, bus.clone()).spawn_listener(stop.clone());

    // 100ms, 200ms, 400ms ... with equal jitter
    let backoff = BackoffPolicy {
        first: Duration::from_millis(100),
        max: Duration::from_secs(2),
        factor: 2.0,
        jitter: JitterPolicy::Equal,
    };
    let transport = MockTransport::new()
        .respond(503, "warming up")
        .respond(503, "warming up")
        .respond(200, "[1, 2, 3]")
        .respond(404, "gone");
    let client = FetchClientBuilder::new(transport.clone())
        .with_base_url("http://api.local")
        .with_retry(RetryPolicy::new(3).with_delay(RetryDelay::Backoff(backoff)))
        .with_bus(bus)
        .build();

    let items: Vec<u32> = client.fetch_json(&RequestSpec::get("/items")).await?;
    println!("items after {} attempts: {items:?}", transport.calls());

    let missing = client
        .executor::<Vec<u32>>(&RequestSpec::get("/items/archived"))
        .with_classifier(|err: &FetchError, escalate: &mut Escalate| {
            if err.status() == Some(404) {
                Ok(Vec::new())
            } else {
                escalate.escalate();
                Err(err.clone())
            }
        })
        .run()
        .await?;
    println!("archived items: {missing:?}");

    stop.cancel();
    listener.await?;
    Ok(())
}
