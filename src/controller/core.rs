use std::sync::Arc;
use std::time::Duration;

use futures::future::{self, BoxFuture};
use parking_lot::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    events::{self, Bus, Event, EventKind},
    tasks::{TaskFn, TaskRef},
};

use super::{
    config::{ControllerConfig, SlotOptions},
    mount::Mounted,
    settled::{Settled, SkipReason},
    slot::{SlotSnapshot, SlotState},
};

/// Future returned by [`Controller::resolve`] and [`Controller::instant_resolve`].
pub type Resolution<T, E> = BoxFuture<'static, Result<Settled<T>, E>>;

/// Owner of one slot of asynchronous work.
///
/// Cheap to clone: clones share the same slot.
pub struct Controller<A, T, E> {
    inner: Arc<Inner<A, T, E>>,
}

struct Inner<A, T, E> {
    name: Arc<str>,
    task: TaskRef<A, T, E>,
    options: SlotOptions,
    state: Mutex<SlotState<T>>,
    bus: Option<Bus>,
}

impl<A, T, E> Clone for Controller<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, T, E> Controller<A, T, E>
where
    A: Send + 'static,
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    /// Creates a controller for `task`.
    pub fn new(task: TaskRef<A, T, E>, config: ControllerConfig<T>) -> Self {
        Self::build(task, config, None)
    }

    /// Creates a controller that publishes its lifecycle to `bus`.
    pub fn with_bus(task: TaskRef<A, T, E>, config: ControllerConfig<T>, bus: Bus) -> Self {
        Self::build(task, config, Some(bus))
    }

    /// Creates a controller from a closure.
    ///
    /// ## Example
    /// ```rust
    /// use taskslot::{Controller, ControllerConfig};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let sum = Controller::from_fn("sum", |(a, b): (i32, i32)| async move {
    ///     Ok::<_, String>(a + b)
    /// }, ControllerConfig::default());
    ///
    /// let settled = sum.resolve((5, 10)).await.unwrap();
    /// assert!(settled.is_committed());
    /// assert_eq!(sum.value(), Some(15));
    /// # }
    /// ```
    pub fn from_fn<F, Fut>(name: &'static str, f: F, config: ControllerConfig<T>) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::new(TaskFn::arc(name, f), config)
    }

    fn build(task: TaskRef<A, T, E>, config: ControllerConfig<T>, bus: Option<Bus>) -> Self {
        let (options, initial) = config.split();
        Self {
            inner: Arc::new(Inner {
                name: Arc::from(task.name()),
                task,
                options,
                state: Mutex::new(SlotState::new(initial)),
                bus,
            }),
        }
    }

    /// Starts an operation after the configured delay.
    ///
    /// Spawns the operation on the current tokio runtime, so the delay counts
    /// from the call and the operation runs whether or not the returned future
    /// is awaited. Must be called within a tokio runtime.
    pub fn resolve(&self, args: A) -> Resolution<T, E> {
        self.start(args, self.inner.options.delay)
    }

    /// Like [`resolve`](Self::resolve) but ignores the configured delay.
    pub fn instant_resolve(&self, args: A) -> Resolution<T, E> {
        self.start(args, Duration::ZERO)
    }

    /// Attaches the controller to an owning scope.
    ///
    /// With `resolve_on_mounted`, spawns one `resolve(A::default())` on the current
    /// tokio runtime and cancels the slot when the returned guard is dropped.
    pub fn mount(&self) -> Mounted<A, T, E>
    where
        A: Default,
    {
        if self.inner.options.resolve_on_mounted {
            let resolution = self.resolve(A::default());
            let name = Arc::clone(&self.inner.name);
            tokio::spawn(async move {
                if resolution.await.is_err() {
                    tracing::warn!(slot = %name, "resolve on mount failed");
                }
            });
        }
        Mounted::new(self.clone(), self.inner.options.resolve_on_mounted)
    }

    /// Restores the initial value, zeroes both counters and cancels any
    /// scheduled or in-flight operation.
    ///
    /// Operations started before the reset never touch the slot again, failures
    /// included.
    pub fn reset(&self) {
        let generation = {
            let mut st = self.inner.state.lock();
            let generation = st.advance();
            st.canceled_at = generation;
            st.reset_at = generation;
            st.resolving = false;
            st.value = st.initial.clone();
            st.resolved_count = 0;
            st.rejected_count = 0;
            generation
        };
        self.inner
            .emit(|| Event::new(EventKind::SlotReset).with_generation(generation));
    }

    /// Copy of the slot's observable state.
    pub fn snapshot(&self) -> SlotSnapshot<T> {
        self.inner.state.lock().snapshot()
    }

    /// Last committed (or directly set) value.
    pub fn value(&self) -> Option<T> {
        self.inner.state.lock().value.clone()
    }

    fn start(&self, args: A, delay: Duration) -> Resolution<T, E> {
        let scheduled = {
            let mut st = self.inner.state.lock();
            if self.inner.options.no_concurrency && st.resolving {
                None
            } else {
                let generation = st.advance();
                let timer = (!delay.is_zero()).then(|| {
                    let timer = CancellationToken::new();
                    st.pending_timer = Some(timer.clone());
                    (timer, Instant::now() + delay)
                });
                Some((generation, timer))
            }
        };

        let Some((generation, timer)) = scheduled else {
            self.inner.emit(|| Event::new(EventKind::ResolveGated));
            return Box::pin(future::ready(Ok(Settled::Skipped(SkipReason::Gated))));
        };

        if timer.is_some() {
            self.inner.emit(|| {
                Event::new(EventKind::ResolveScheduled)
                    .with_generation(generation)
                    .with_delay(delay)
            });
        }

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(inner.run(generation, args, timer));
        Box::pin(async move {
            match handle.await {
                Ok(settled) => settled,
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(_) => Ok(Settled::Skipped(SkipReason::Canceled)),
            }
        })
    }
}

impl<A, T, E> Controller<A, T, E> {
    /// Invalidates the live generation and clears any pending delay.
    ///
    /// Unless `keep_resolving` is set, `resolving` drops to `false` at once, even
    /// though an in-flight invocation keeps running and will settle as stale.
    pub fn cancel(&self, keep_resolving: bool) {
        let generation = {
            let mut st = self.inner.state.lock();
            let generation = st.advance();
            st.canceled_at = generation;
            if !keep_resolving {
                st.resolving = false;
            }
            generation
        };
        self.inner
            .emit(|| Event::new(EventKind::SlotCanceled).with_generation(generation));
    }

    /// Overwrites the value directly.
    ///
    /// Does not advance the generation: an in-flight current invocation may still
    /// overwrite this value when it succeeds.
    pub fn set_value(&self, value: Option<T>) {
        self.inner.state.lock().value = value;
    }

    /// Replaces the value with `f(previous)`.
    ///
    /// `f` runs under the slot lock and must not call back into this controller.
    pub fn update_value<F>(&self, f: F)
    where
        F: FnOnce(Option<&T>) -> Option<T>,
    {
        let mut st = self.inner.state.lock();
        st.value = f(st.value.as_ref());
    }

    /// Whether an invocation is in flight for the live generation.
    pub fn is_resolving(&self) -> bool {
        self.inner.state.lock().resolving
    }

    /// Committed successes since creation or the last reset.
    pub fn resolved_count(&self) -> u64 {
        self.inner.state.lock().resolved_count
    }

    /// Counted failures since creation or the last reset.
    pub fn rejected_count(&self) -> u64 {
        self.inner.state.lock().rejected_count
    }

    /// Live generation.
    pub fn generation(&self) -> u64 {
        self.inner.state.lock().generation
    }

    /// Name of the slot (the task's name).
    pub fn name(&self) -> &str {
        &self.inner.name
    }
}

impl<A, T, E> Inner<A, T, E> {
    fn emit(&self, ev: impl FnOnce() -> Event) {
        events::emit(self.bus.as_ref(), || {
            ev().with_source(Arc::clone(&self.name))
        });
    }
}

impl<A, T, E> Inner<A, T, E>
where
    A: Send + 'static,
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    async fn run(
        self: Arc<Self>,
        generation: u64,
        args: A,
        timer: Option<(CancellationToken, Instant)>,
    ) -> Result<Settled<T>, E> {
        if let Some((timer, deadline)) = timer {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {}
                _ = timer.cancelled() => {}
            }
        }

        let proceed = {
            let mut st = self.state.lock();
            if st.is_current(generation) {
                st.pending_timer = None;
                if self.options.reset_at_resolve {
                    st.value = st.initial.clone();
                }
                st.resolving = true;
                Ok(())
            } else {
                Err(st.skip_reason(generation))
            }
        };
        if let Err(reason) = proceed {
            self.emit(|| {
                Event::new(EventKind::ResolveSkipped)
                    .with_generation(generation)
                    .with_reason(reason.as_label())
            });
            return Ok(Settled::Skipped(reason));
        }

        self.emit(|| Event::new(EventKind::ResolveStarted).with_generation(generation));
        let mut in_flight = InFlight::new(&self.state, generation);
        let result = self.task.invoke(args).await;
        in_flight.disarm();

        match result {
            Ok(value) => {
                let committed = {
                    let mut st = self.state.lock();
                    if st.is_current(generation) {
                        st.value = Some(value.clone());
                        st.resolving = false;
                        st.resolved_count += 1;
                        true
                    } else {
                        false
                    }
                };
                if committed {
                    self.emit(|| {
                        Event::new(EventKind::ResolveCommitted).with_generation(generation)
                    });
                    Ok(Settled::Committed(value))
                } else {
                    self.emit(|| {
                        Event::new(EventKind::ResolveDiscarded).with_generation(generation)
                    });
                    Ok(Settled::Stale(value))
                }
            }
            Err(err) => {
                {
                    let mut st = self.state.lock();
                    if generation > st.reset_at {
                        st.resolving = false;
                        st.rejected_count += 1;
                    }
                }
                self.emit(|| Event::new(EventKind::ResolveRejected).with_generation(generation));
                Err(err)
            }
        }
    }
}

/// Releases `resolving` if the spawned operation is torn down mid-invocation
/// (task panic or runtime shutdown) while its generation is still live.
struct InFlight<'a, T> {
    state: &'a Mutex<SlotState<T>>,
    generation: u64,
    armed: bool,
}

impl<'a, T> InFlight<'a, T> {
    fn new(state: &'a Mutex<SlotState<T>>, generation: u64) -> Self {
        Self {
            state,
            generation,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut st = self.state.lock();
        if st.is_current(self.generation) {
            st.resolving = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    type Ctl<A, T> = Controller<A, T, String>;

    async fn until(mut cond: impl FnMut() -> bool) {
        for _ in 0..1_000 {
            if cond() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("condition never became true");
    }

    /// Task that sleeps `ms` and echoes it back, counting invocations.
    fn sleeper(calls: Arc<AtomicU32>, config: ControllerConfig<u64>) -> Ctl<u64, u64> {
        Controller::from_fn(
            "sleeper",
            move |ms: u64| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    Ok(ms)
                }
            },
            config,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_commits_value_and_counts() {
        let ctl: Ctl<(i32, i32), i32> = Controller::from_fn(
            "sum",
            |(a, b): (i32, i32)| async move { Ok(a + b) },
            ControllerConfig::default(),
        );

        let settled = ctl.resolve((5, 10)).await.unwrap();

        assert_eq!(settled, Settled::Committed(15));
        let snap = ctl.snapshot();
        assert_eq!(snap.value, Some(15));
        assert!(!snap.resolving);
        assert_eq!(snap.resolved_count, 1);
        assert_eq!(snap.rejected_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_is_counted_and_propagated() {
        let ctl: Ctl<(), i32> = Controller::from_fn(
            "fail",
            |()| async { Err("fail".to_string()) },
            ControllerConfig::default(),
        );

        let err = ctl.resolve(()).await.unwrap_err();

        assert_eq!(err, "fail");
        assert_eq!(ctl.rejected_count(), 1);
        assert_eq!(ctl.resolved_count(), 0);
        assert!(!ctl.is_resolving());
        assert_eq!(ctl.value(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gate_refuses_while_resolving() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(calls.clone(), ControllerConfig::default());

        let first = tokio::spawn(ctl.resolve(100));
        until(|| ctl.is_resolving()).await;

        let second = ctl.resolve(5).await.unwrap();
        assert_eq!(second, Settled::Skipped(SkipReason::Gated));
        assert_eq!(ctl.resolved_count(), 0);
        assert_eq!(ctl.rejected_count(), 0);

        assert_eq!(first.await.unwrap().unwrap(), Settled::Committed(100));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctl.resolved_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_success_does_not_overwrite_newer_value() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(
            calls.clone(),
            ControllerConfig::default().with_no_concurrency(false),
        );

        let slow = tokio::spawn(ctl.resolve(200));
        until(|| ctl.is_resolving()).await;
        let fast = tokio::spawn(ctl.resolve(50));

        assert_eq!(fast.await.unwrap().unwrap(), Settled::Committed(50));
        assert_eq!(slow.await.unwrap().unwrap(), Settled::Stale(200));

        let snap = ctl.snapshot();
        assert_eq!(snap.value, Some(50));
        assert_eq!(snap.resolved_count, 1);
        assert!(!snap.resolving);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_resolves_all_commit() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(
            calls.clone(),
            ControllerConfig::default().with_no_concurrency(false),
        );

        for ms in [10, 20, 30] {
            ctl.resolve(ms).await.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(ctl.resolved_count(), 3);
        assert_eq!(ctl.value(), Some(30));
        assert!(!ctl.is_resolving());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_delay_skips_invocation() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(
            calls.clone(),
            ControllerConfig::default().with_delay(Duration::from_millis(500)),
        );

        let pending = ctl.resolve(1);
        ctl.cancel(false);
        ctl.cancel(false);

        assert_eq!(pending.await.unwrap(), Settled::Skipped(SkipReason::Canceled));
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!ctl.is_resolving());
        assert_eq!(ctl.resolved_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_resolve_supersedes_scheduled_one() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(
            calls.clone(),
            ControllerConfig::default().with_delay(Duration::from_millis(300)),
        );

        let first = ctl.resolve(1);
        let second = ctl.resolve(2);
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap(), Settled::Skipped(SkipReason::Superseded));
        assert_eq!(second.unwrap(), Settled::Committed(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_waited_before_invocation() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(
            calls.clone(),
            ControllerConfig::default().with_delay(Duration::from_millis(500)),
        );
        let started = tokio::time::Instant::now();

        assert_eq!(ctl.resolve(0).await.unwrap(), Settled::Committed(0));
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_instant_resolve_ignores_delay() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(
            calls.clone(),
            ControllerConfig::default().with_delay(Duration::from_secs(10)),
        );
        let started = tokio::time::Instant::now();

        assert_eq!(ctl.instant_resolve(0).await.unwrap(), Settled::Committed(0));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_counts_even_after_cancel() {
        let ctl: Ctl<(), i32> = Controller::from_fn(
            "late-failure",
            |()| async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Err("late".to_string())
            },
            ControllerConfig::default(),
        );

        let running = tokio::spawn(ctl.resolve(()));
        until(|| ctl.is_resolving()).await;
        ctl.cancel(true);
        assert!(ctl.is_resolving());

        assert_eq!(running.await.unwrap().unwrap_err(), "late");
        assert_eq!(ctl.rejected_count(), 1);
        assert!(!ctl.is_resolving());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_counts_even_after_newer_resolve() {
        let ctl: Ctl<u64, u64> = Controller::from_fn(
            "mixed",
            |ms: u64| async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                if ms > 100 { Err("slow failed".to_string()) } else { Ok(ms) }
            },
            ControllerConfig::default().with_no_concurrency(false),
        );

        let failing = tokio::spawn(ctl.resolve(200));
        until(|| ctl.is_resolving()).await;
        let newer = ctl.resolve(10).await.unwrap();
        assert_eq!(newer, Settled::Committed(10));

        assert!(failing.await.unwrap().is_err());
        let snap = ctl.snapshot();
        assert_eq!(snap.resolved_count, 1);
        assert_eq!(snap.rejected_count, 1);
        assert_eq!(snap.value, Some(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_clears_resolving_and_discards_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(calls.clone(), ControllerConfig::default());

        let running = tokio::spawn(ctl.resolve(100));
        until(|| ctl.is_resolving()).await;
        ctl.cancel(false);
        assert!(!ctl.is_resolving());

        assert_eq!(running.await.unwrap().unwrap(), Settled::Stale(100));
        assert_eq!(ctl.value(), None);
        assert_eq!(ctl.resolved_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_while_scheduled() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(
            calls.clone(),
            ControllerConfig::default().with_delay(Duration::from_millis(500)),
        );

        let pending = tokio::spawn(ctl.resolve(1));
        tokio::time::sleep(Duration::from_millis(250)).await;
        ctl.reset();

        let snap = ctl.snapshot();
        assert_eq!(snap.value, None);
        assert!(!snap.resolving);
        assert_eq!((snap.resolved_count, snap.rejected_count), (0, 0));

        assert_eq!(
            pending.await.unwrap().unwrap(),
            Settled::Skipped(SkipReason::Canceled)
        );
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_after_mixed_outcomes() {
        let script = Arc::new(Mutex::new(vec![Ok("second"), Err("fail"), Ok("first")]));
        let ctl: Ctl<(), &'static str> = Controller::from_fn(
            "scripted",
            move |()| {
                let next = script.lock().pop().unwrap_or(Err("empty"));
                async move { next.map_err(str::to_string) }
            },
            ControllerConfig::default(),
        );

        ctl.resolve(()).await.unwrap();
        assert_eq!(ctl.value(), Some("first"));
        assert!(ctl.resolve(()).await.is_err());
        ctl.resolve(()).await.unwrap();

        let snap = ctl.snapshot();
        assert_eq!(snap.value, Some("second"));
        assert_eq!((snap.resolved_count, snap.rejected_count), (2, 1));

        ctl.reset();
        let snap = ctl.snapshot();
        assert_eq!(snap.value, None);
        assert!(!snap.resolving);
        assert_eq!((snap.resolved_count, snap.rejected_count), (0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_failure_ignored_across_reset() {
        let ctl: Ctl<(), i32> = Controller::from_fn(
            "late-failure",
            |()| async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Err("late".to_string())
            },
            ControllerConfig::default(),
        );

        let running = tokio::spawn(ctl.resolve(()));
        until(|| ctl.is_resolving()).await;
        ctl.reset();

        assert!(running.await.unwrap().is_err());
        assert_eq!(ctl.rejected_count(), 0);
        assert!(!ctl.is_resolving());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_value_and_update_value_bypass_counters() {
        let ctl: Ctl<(), i32> = Controller::from_fn(
            "noop",
            |()| async { Ok(0) },
            ControllerConfig::default().with_initial_value(10),
        );
        assert_eq!(ctl.value(), Some(10));

        ctl.update_value(|prev| prev.map(|v| v + 5));
        assert_eq!(ctl.value(), Some(15));

        ctl.set_value(Some(42));
        let snap = ctl.snapshot();
        assert_eq!(snap.value, Some(42));
        assert!(!snap.resolving);
        assert_eq!((snap.resolved_count, snap.rejected_count), (0, 0));
        assert_eq!(snap.generation, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_value_can_be_overwritten_by_in_flight_commit() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(calls, ControllerConfig::default());

        let running = tokio::spawn(ctl.resolve(100));
        until(|| ctl.is_resolving()).await;
        ctl.set_value(Some(7));

        running.await.unwrap().unwrap();
        assert_eq!(ctl.value(), Some(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_at_resolve_restores_initial_value_on_start() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(
            calls,
            ControllerConfig::default()
                .with_initial_value(1)
                .with_reset_at_resolve(true),
        );
        ctl.set_value(Some(99));

        let running = tokio::spawn(ctl.resolve(100));
        until(|| ctl.is_resolving()).await;
        assert_eq!(ctl.value(), Some(1));

        running.await.unwrap().unwrap();
        assert_eq!(ctl.value(), Some(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_resolution_still_runs_and_commits() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(
            calls.clone(),
            ControllerConfig::default().with_no_concurrency(false),
        );

        let slow = tokio::spawn(ctl.resolve(100));
        until(|| ctl.is_resolving()).await;
        drop(ctl.resolve(5));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(slow.await.unwrap().unwrap(), Settled::Stale(100));
        let snap = ctl.snapshot();
        assert_eq!(snap.value, Some(5));
        assert!(!snap.resolving);
        assert_eq!(snap.resolved_count, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_counts_from_the_call() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctl = sleeper(
            calls.clone(),
            ControllerConfig::default().with_delay(Duration::from_millis(500)),
        );
        let started = tokio::time::Instant::now();

        let pending = ctl.resolve(0);
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(pending.await.unwrap(), Settled::Committed(0));

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(500) && elapsed < Duration::from_millis(510));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_task_releases_gate() {
        let ctl: Ctl<bool, i32> = Controller::from_fn(
            "panicky",
            |fail: bool| async move {
                if fail {
                    panic!("task panicked");
                }
                Ok(1)
            },
            ControllerConfig::default(),
        );

        let joined = tokio::spawn(ctl.resolve(true)).await;
        assert!(joined.unwrap_err().is_panic());
        assert!(!ctl.is_resolving());
        assert_eq!(ctl.rejected_count(), 0);

        assert_eq!(ctl.resolve(false).await.unwrap(), Settled::Committed(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_follow_the_slot_lifecycle() {
        let bus = Bus::new(32);
        let mut rx = bus.subscribe();
        let task: TaskRef<(), i32, String> = TaskFn::arc("observed", |()| async { Ok::<_, String>(1) });
        let ctl = Controller::with_bus(
            task,
            ControllerConfig::default().with_delay(Duration::from_millis(10)),
            bus,
        );

        ctl.resolve(()).await.unwrap();
        ctl.cancel(false);

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            assert_eq!(ev.source.as_deref(), Some("observed"));
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::ResolveScheduled,
                EventKind::ResolveStarted,
                EventKind::ResolveCommitted,
                EventKind::SlotCanceled,
            ]
        );
    }
}
