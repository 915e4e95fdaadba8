//! # Example: debounced_search
//!
//! A search slot with a 300ms delay: keystrokes arriving faster than the delay
//! supersede each other, so only the last query reaches the server.
//!
//! ## Flow
//! ```text
//! resolve("r")   ─► generation 1 ─► delay ─► superseded
//! resolve("ru")  ─► generation 2 ─► delay ─► superseded
//! resolve("rust")─► generation 3 ─► delay ─► GET /memo?category_id=3 ─► Committed
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example debounced_search
//! ```

use std::sync::Arc;
use std::time::Duration;

use taskslot::api::NotesApi;
use taskslot::testing::MockTransport;
use taskslot::{
    Bus, Controller, ControllerConfig, FetchClientBuilder, LogWriter, SharedToken, Subscribe,
    SubscriberSet, TaskFn, TaskRef, telemetry,
};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing("info,taskslot::events=debug");

    // 1. Events go through one bus into the built-in log writer
    let bus = Bus::new(256);
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let stop = CancellationToken::new();
    let listener = SubscriberSet::new(subs, bus.clone()).spawn_listener(stop.clone());

    // 2. Notes client over a scripted transport
    let transport = MockTransport::new()
        .with_latency(Duration::from_millis(50))
        .always(200, r#"[{"id":1,"title":"rust ownership"},{"id":2,"title":"rust async"}]"#);
    let token = SharedToken::new();
    let client = FetchClientBuilder::new(transport.clone())
        .with_base_url("http://notes.local")
        .with_credentials(token.clone())
        .with_bus(bus.clone())
        .build();
    let api = NotesApi::new(client, token);
    api.login("demo-token");

    // 3. Search slot keyed by query length (stand-in for a category id)
    let search: TaskRef<String, Vec<taskslot::api::MemoSummary>, taskslot::FetchError> =
        TaskFn::arc("search", move |query: String| {
            let api = api.clone();
            async move { api.search_memos(query.len() as u64).await }
        });
    let slot = Controller::with_bus(
        search,
        ControllerConfig::default().with_delay(Duration::from_millis(300)),
        bus,
    );

    // 4. Three "keystrokes" in quick succession
    let pending: Vec<_> = ["r", "ru", "rust"]
        .into_iter()
        .map(|q| slot.resolve(q.to_string()))
        .collect();
    for (i, settled) in futures::future::join_all(pending).await.into_iter().enumerate() {
        println!("resolve #{i}: {:?}", settled?);
    }

    println!("requests sent: {}", transport.calls());
    println!("slot: {:?}", slot.snapshot());

    stop.cancel();
    listener.await?;
    Ok(())
}
