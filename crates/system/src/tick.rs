use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Work invoked on every tick of a registration.
pub type TickCallback = Box<dyn FnMut() + Send + 'static>;

/// Periodic scheduler that sampling callbacks are registered with.
///
/// Implementations must never run two firings of the same registration at
/// once; different registrations may run in parallel.  `register` may run
/// the callback before it returns, so callers must not hold locks the
/// callback needs.
pub trait TickPool {
    fn register(&self, callback: TickCallback, period: Duration, fire_immediately: bool)
        -> TickHandle;
}

/// Keeps a registration alive.  Dropping the handle cancels it.
pub struct TickHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TickHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickHandle")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// [`TickPool`] running each registration as its own Tokio task.
#[derive(Debug, Clone)]
pub struct TokioTickPool {
    handle: Handle,
}

impl TokioTickPool {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime of the calling context.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl TickPool for TokioTickPool {
    /// # Panics
    /// The spawned task panics if `period` is zero.
    fn register(&self, mut callback: TickCallback, period: Duration, fire_immediately: bool)
        -> TickHandle
    {
        let task = self.handle.spawn(async move {
            let start = if fire_immediately {
                Instant::now()
            } else {
                Instant::now() + period
            };
            let mut ticker = time::interval_at(start, period);
            // A late tick fires once, then the schedule resumes; no bursts.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                callback();
            }
        });

        let abort = task.abort_handle();
        TickHandle::new(move || abort.abort())
    }
}
