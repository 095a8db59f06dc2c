use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

struct TimerInner {
    cancelled: AtomicBool,
    // Held for the duration of each tick body. cancel() takes it too, so once
    // cancel() returns no further callback invocation can start.
    tick_lock: Mutex<()>,
    task: Mutex<Option<JoinHandle<()>>>,
}

// Callback panics are isolated (see spawn_inner), but a poisoned lock must
// still never turn cancel() into a panic: cancel runs on lifecycle teardown
// paths, including Drop.
fn recover<'a, T>(lock: &'a Mutex<T>) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a periodic timer running on the tokio runtime.
///
/// Parity goal with lifecycle timers:
/// - plain timers run their callback on every tick once created
/// - gated timers keep ticking, but the callback is skipped while the
///   predicate (typically "component is Active") is false
///
/// The handle is cheap to clone; any clone may cancel. Dropping a handle does
/// NOT cancel the timer — teardown paths must call `cancel()`.
#[derive(Clone)]
pub struct TimerHandle {
    inner: Arc<TimerInner>,
}

impl TimerHandle {
    /// Spawn a timer whose callback runs unconditionally every `period`.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<F>(period: Duration, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self::spawn_inner(period, callback, || true)
    }

    /// Spawn a timer whose tick still occurs every `period`, but whose
    /// callback only runs when `active()` is true.
    ///
    /// Gating is best-effort: a tick may observe a stale predicate value just
    /// after a transition.
    pub fn spawn_gated<F, P>(period: Duration, callback: F, active: P) -> Self
    where
        F: FnMut() + Send + 'static,
        P: Fn() -> bool + Send + 'static,
    {
        Self::spawn_inner(period, callback, active)
    }

    fn spawn_inner<F, P>(period: Duration, mut callback: F, active: P) -> Self
    where
        F: FnMut() + Send + 'static,
        P: Fn() -> bool + Send + 'static,
    {
        let inner = Arc::new(TimerInner {
            cancelled: AtomicBool::new(false),
            tick_lock: Mutex::new(()),
            task: Mutex::new(None),
        });

        let tick_inner = Arc::clone(&inner);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately; consume it so the
            // callback first fires one full period after creation.
            interval.tick().await;

            loop {
                interval.tick().await;

                let _guard = recover(&tick_inner.tick_lock);
                if tick_inner.cancelled.load(Ordering::Acquire) {
                    break;
                }
                if active() {
                    // A panicking callback is an isolated fault, like a
                    // panicking transition handler or observer: the timer
                    // keeps ticking and cancel() keeps working.
                    if catch_unwind(AssertUnwindSafe(&mut callback)).is_err() {
                        tracing::warn!("timer callback panicked; timer keeps running");
                    }
                }
            }
        });

        *recover(&inner.task) = Some(task);

        Self { inner }
    }

    /// Stop the timer. Idempotent: cancelling an already-cancelled timer is a
    /// no-op.
    ///
    /// Once this returns, no further callback invocation starts; a callback
    /// that already started may finish (this call waits for it). Must not be
    /// called from inside the timer's own callback.
    pub fn cancel(&self) {
        let _guard = recover(&self.inner.tick_lock);
        self.inner.cancelled.store(true, Ordering::Release);
        if let Some(task) = recover(&self.inner.task).take() {
            task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }
}
