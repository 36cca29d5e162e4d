use procmon_core::{MonitorError, Result};
use std::time::Duration;
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Counters of the process being monitored.
///
/// `refresh` is called once per sample; the getters then report the values
/// captured by the most recent refresh.
pub trait ProcessSource: Send {
    fn refresh(&mut self) -> Result<()>;

    /// Resident set size in bytes.
    fn resident_memory_bytes(&self) -> u64;

    /// CPU time consumed since the process started, summed over all threads.
    fn cumulative_cpu_time(&self) -> Duration;
}

/// [`ProcessSource`] reading a single PID through `sysinfo`.
pub struct SysinfoProcess {
    sys:      System,
    pid:      Pid,
    memory:   u64,
    cpu_time: Duration,
}

impl SysinfoProcess {
    pub fn new(pid: Pid) -> Self {
        Self {
            sys: System::new(),
            pid,
            memory: 0,
            cpu_time: Duration::ZERO,
        }
    }

    /// Monitor the calling process.
    pub fn current() -> Self {
        Self::new(Pid::from_u32(std::process::id()))
    }
}

impl ProcessSource for SysinfoProcess {
    fn refresh(&mut self) -> Result<()> {
        // Refresh only the monitored process
        self.sys.refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);

        let process = self
            .sys
            .process(self.pid)
            .ok_or(MonitorError::ProcessNotFound(self.pid.as_u32()))?;

        self.memory = process.memory();
        // accumulated_cpu_time() is in milliseconds
        self.cpu_time = Duration::from_millis(process.accumulated_cpu_time());
        Ok(())
    }

    fn resident_memory_bytes(&self) -> u64 {
        self.memory
    }

    fn cumulative_cpu_time(&self) -> Duration {
        self.cpu_time
    }
}
