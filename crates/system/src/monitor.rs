use crate::clock::{Clock, SystemClock};
use crate::history::{History, DEFAULT_CAPACITY};
use crate::source::{ProcessSource, SysinfoProcess};
use crate::tick::{TickHandle, TickPool};
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::{Mutex, RwLock};
use procmon_config::MonitorConfig;
use procmon_core::{MonitorError, Report, Result, Sample};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default sampling period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Counter state private to `create_snapshot`.
struct Sampler {
    source:             Box<dyn ProcessSource>,
    last_snapshot_time: Option<DateTime<Utc>>,
    last_cpu_time:      Duration,
}

/// History, dirty flag and cached report, guarded as one unit.
struct Shared {
    history:         History,
    history_changed: bool,
    last_report:     Option<Arc<Report>>,
}

enum TickerSlot {
    Vacant,
    /// `TickPool::register` is in progress; the slot lock is not held.
    Starting,
    Running(TickHandle),
    /// Registration was cancelled; the slot stays taken.
    Stopped,
}

/// In-process CPU and memory monitor.
///
/// A registered ticker (or the embedder) calls [`Monitor::create_snapshot`]
/// periodically; any number of threads may call [`Monitor::get_report`]
/// concurrently.  Reports are cached and only rebuilt after a new sample.
pub struct Monitor {
    start_time: DateTime<Utc>,
    clock:      Arc<dyn Clock>,
    sampler:    Mutex<Sampler>,
    shared:     RwLock<Shared>,
    ticker:     Mutex<TickerSlot>,
}

impl Monitor {
    pub fn new(source: impl ProcessSource + 'static, clock: impl Clock + 'static) -> Self {
        Self::with_capacity(source, clock, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(
        source: impl ProcessSource + 'static,
        clock: impl Clock + 'static,
        capacity: usize,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(clock);
        Self {
            start_time: clock.now(),
            clock,
            sampler: Mutex::new(Sampler {
                source: Box::new(source),
                last_snapshot_time: None,
                last_cpu_time: Duration::ZERO,
            }),
            shared: RwLock::new(Shared {
                history: History::new(capacity),
                history_changed: true,
                last_report: None,
            }),
            ticker: Mutex::new(TickerSlot::Vacant),
        }
    }

    /// Monitor the calling process with the wall clock.
    pub fn current_process() -> Self {
        Self::new(SysinfoProcess::current(), SystemClock)
    }

    /// Like [`Monitor::current_process`], sized from `config`.
    pub fn current_process_with(config: &MonitorConfig) -> Self {
        Self::with_capacity(SysinfoProcess::current(), SystemClock, config.history_capacity)
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn uptime(&self) -> TimeDelta {
        self.clock.now() - self.start_time
    }

    pub fn capacity(&self) -> usize {
        self.shared.read().history.capacity()
    }

    /// Take one sample now and append it to the history.
    ///
    /// Sampling is serialised internally, so a manual call racing a scheduled
    /// one only waits; the CPU ratio of each sample covers the time since the
    /// previous one.  The first sample has no predecessor and reports `0.0`.
    pub fn create_snapshot(&self) -> Result<()> {
        // Held until the push so samples enter the history in the order
        // their counters were read.  Lock order is sampler, then shared.
        let mut sampler = self.sampler.lock();
        sampler.source.refresh()?;

        let current_snapshot_time = self.clock.now();
        let current_cpu_time = sampler.source.cumulative_cpu_time();
        let memory = sampler.source.resident_memory_bytes();

        let cpu = match sampler.last_snapshot_time {
            Some(last) => cpu_ratio(
                current_cpu_time.saturating_sub(sampler.last_cpu_time),
                current_snapshot_time - last,
            ),
            None => 0.0,
        };

        sampler.last_snapshot_time = Some(current_snapshot_time);
        sampler.last_cpu_time = current_cpu_time;
        let sample = Sample { cpu, memory };

        debug!(cpu = sample.cpu, memory = sample.memory, "snapshot taken");

        let mut shared = self.shared.write();
        shared.history.push(sample);
        shared.history_changed = true;
        Ok(())
    }

    /// Current history as an immutable report.
    ///
    /// Readers share the lock while the cache is fresh; a stale cache is
    /// rebuilt once under the exclusive lock.
    pub fn get_report(&self) -> Arc<Report> {
        {
            let shared = self.shared.read();
            if !shared.history_changed {
                if let Some(report) = &shared.last_report {
                    return Arc::clone(report);
                }
            }
        }

        let mut shared = self.shared.write();
        // Another reader may have rebuilt while we waited.
        if !shared.history_changed {
            if let Some(report) = &shared.last_report {
                return Arc::clone(report);
            }
        }

        let report = Arc::new(shared.history.report());
        shared.last_report = Some(Arc::clone(&report));
        shared.history_changed = false;
        report
    }

    /// Register [`Monitor::create_snapshot`] with `pool`.
    ///
    /// Fails with [`MonitorError::AlreadyRunning`] if this monitor has been
    /// registered before; the existing registration is left untouched.
    /// The ticker holds only a weak reference, so dropping the last
    /// `Arc<Monitor>` ends sampling.
    pub fn start_timed_snapshots(
        self: &Arc<Self>,
        pool: &dyn TickPool,
        interval: Duration,
        immediate: bool,
    ) -> Result<()> {
        {
            let mut slot = self.ticker.lock();
            if !matches!(*slot, TickerSlot::Vacant) {
                return Err(MonitorError::AlreadyRunning);
            }
            *slot = TickerSlot::Starting;
        }

        // Registration may fire the callback synchronously, so the slot lock
        // must not be held here.
        let monitor = Arc::downgrade(self);
        let handle = pool.register(
            Box::new(move || {
                let Some(monitor) = monitor.upgrade() else {
                    return;
                };
                if let Err(e) = monitor.create_snapshot() {
                    warn!("Scheduled snapshot failed: {e}");
                }
            }),
            interval,
            immediate,
        );

        let mut slot = self.ticker.lock();
        if matches!(*slot, TickerSlot::Starting) {
            *slot = TickerSlot::Running(handle);
            info!("Timed snapshots started (every {interval:?})");
        } else {
            // Stopped while registering.
            handle.cancel();
        }
        Ok(())
    }

    /// [`Monitor::start_timed_snapshots`] using the interval and start mode
    /// from `config`.
    pub fn start_timed_snapshots_with(
        self: &Arc<Self>,
        pool: &dyn TickPool,
        config: &MonitorConfig,
    ) -> Result<()> {
        self.start_timed_snapshots(pool, config.interval(), config.immediate)
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.ticker.lock(), TickerSlot::Starting | TickerSlot::Running(_))
    }

    /// Cancel the registration.  The monitor cannot be registered again.
    pub fn stop_timed_snapshots(&self) {
        let mut slot = self.ticker.lock();
        match std::mem::replace(&mut *slot, TickerSlot::Stopped) {
            TickerSlot::Running(handle) => {
                handle.cancel();
                info!("Timed snapshots stopped");
            }
            // start_timed_snapshots cancels the new handle when it sees this.
            TickerSlot::Starting => {}
            previous => *slot = previous,
        }
    }
}

/// CPU time over wall time; `0.0` when no time has passed.
fn cpu_ratio(cpu: Duration, elapsed: TimeDelta) -> f32 {
    match elapsed.to_std() {
        Ok(elapsed) if !elapsed.is_zero() => (cpu.as_secs_f64() / elapsed.as_secs_f64()) as f32,
        _ => 0.0,
    }
}
