//! Scripted collaborators shared by the unit tests.

use crate::clock::Clock;
use crate::source::ProcessSource;
use crate::tick::{TickCallback, TickHandle, TickPool};
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use procmon_core::{MonitorError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct Reading {
    memory:    u64,
    cpu_time:  Duration,
    fail_next: bool,
    refreshes: usize,
}

/// Process source whose counters are set by the test.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeProcess {
    reading: Arc<Mutex<Reading>>,
}

impl FakeProcess {
    pub(crate) fn set(&self, memory: u64, cpu_time: Duration) {
        let mut reading = self.reading.lock();
        reading.memory = memory;
        reading.cpu_time = cpu_time;
    }

    pub(crate) fn fail_next(&self) {
        self.reading.lock().fail_next = true;
    }

    pub(crate) fn refreshes(&self) -> usize {
        self.reading.lock().refreshes
    }
}

impl ProcessSource for FakeProcess {
    fn refresh(&mut self) -> Result<()> {
        let mut reading = self.reading.lock();
        reading.refreshes += 1;
        if std::mem::take(&mut reading.fail_next) {
            return Err(MonitorError::ProcessNotFound(0));
        }
        Ok(())
    }

    fn resident_memory_bytes(&self) -> u64 {
        self.reading.lock().memory
    }

    fn cumulative_cpu_time(&self) -> Duration {
        self.reading.lock().cpu_time
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub(crate) struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub(crate) fn new() -> Self {
        let start = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        *self.now.lock() += TimeDelta::from_std(by).unwrap();
    }

    pub(crate) fn rewind(&self, by: Duration) {
        *self.now.lock() -= TimeDelta::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

struct Registration {
    callback:  TickCallback,
    period:    Duration,
    cancelled: Arc<AtomicBool>,
}

/// Tick pool that fires only when the test calls [`ManualTickPool::fire`].
#[derive(Clone, Default)]
pub(crate) struct ManualTickPool {
    registrations: Arc<Mutex<Vec<Registration>>>,
}

impl ManualTickPool {
    /// Fire every live registration once.
    pub(crate) fn fire(&self) {
        for registration in self.registrations.lock().iter_mut() {
            if !registration.cancelled.load(Ordering::SeqCst) {
                (registration.callback)();
            }
        }
    }

    pub(crate) fn periods(&self) -> Vec<Duration> {
        self.registrations.lock().iter().map(|r| r.period).collect()
    }
}

impl TickPool for ManualTickPool {
    fn register(&self, mut callback: TickCallback, period: Duration, fire_immediately: bool)
        -> TickHandle
    {
        if fire_immediately {
            callback();
        }
        let cancelled = Arc::new(AtomicBool::new(false));
        self.registrations.lock().push(Registration {
            callback,
            period,
            cancelled: Arc::clone(&cancelled),
        });
        TickHandle::new(move || cancelled.store(true, Ordering::SeqCst))
    }
}

/// Tick pool that runs `hook` from inside `register` and never fires.
pub(crate) struct HookPool<F> {
    hook:      F,
    cancelled: Arc<AtomicBool>,
}

impl<F: Fn()> HookPool<F> {
    pub(crate) fn new(hook: F) -> Self {
        Self {
            hook,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl<F: Fn()> TickPool for HookPool<F> {
    fn register(&self, _callback: TickCallback, _period: Duration, _fire_immediately: bool)
        -> TickHandle
    {
        (self.hook)();
        let cancelled = Arc::clone(&self.cancelled);
        TickHandle::new(move || cancelled.store(true, Ordering::SeqCst))
    }
}

/// Process whose resident memory grows by one byte per refresh.
#[derive(Debug, Default)]
pub(crate) struct CountingProcess {
    memory: u64,
}

impl ProcessSource for CountingProcess {
    fn refresh(&mut self) -> Result<()> {
        self.memory += 1;
        Ok(())
    }

    fn resident_memory_bytes(&self) -> u64 {
        self.memory
    }

    fn cumulative_cpu_time(&self) -> Duration {
        Duration::from_millis(self.memory)
    }
}
