use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure parsed from `procmon.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Sampling period in milliseconds.
    pub interval_ms: u64,
    /// Take one sample as soon as the ticker is registered.
    pub immediate: bool,
    /// Number of samples kept in the rolling history.
    pub history_capacity: usize,
    /// How often the `procmon` binary logs a report, in milliseconds.
    pub report_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms:        1000,
            immediate:          true,
            history_capacity:   60, // one minute at 1 Hz
            report_interval_ms: 5000,
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }
}
