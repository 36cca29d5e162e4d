//! In-process resource monitor: samples the host process's CPU and memory on
//! a timer, keeps a rolling minute of history and serves cached reports.

pub mod clock;
pub mod format;
pub mod history;
pub mod monitor;
pub mod source;
pub mod tick;

#[cfg(test)]
mod testing;

pub use clock::{Clock, SystemClock};
pub use format::{format_bytes, format_cpu, summarize};
pub use history::{History, DEFAULT_CAPACITY};
pub use monitor::{Monitor, DEFAULT_INTERVAL};
pub use source::{ProcessSource, SysinfoProcess};
pub use tick::{TickCallback, TickHandle, TickPool, TokioTickPool};

pub use procmon_core::{MonitorError, Report, Result, Sample};
