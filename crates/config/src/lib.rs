pub mod schema;

pub use schema::MonitorConfig;

use procmon_core::{MonitorError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `MonitorConfig::default()` if
/// the file doesn't exist so the monitor always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<MonitorConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(MonitorConfig::default());
    }

    let raw = std::fs::read_to_string(path)?;

    let config: MonitorConfig =
        toml::from_str(&raw).map_err(|e| MonitorError::Config(format!("TOML parse error: {e}")))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &MonitorConfig) -> Result<()> {
    if config.interval_ms == 0 {
        return Err(MonitorError::Config("interval_ms must be greater than zero".into()));
    }
    if config.report_interval_ms == 0 {
        return Err(MonitorError::Config("report_interval_ms must be greater than zero".into()));
    }
    if config.history_capacity == 0 {
        return Err(MonitorError::Config("history_capacity must be at least 1".into()));
    }
    Ok(())
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("procmon").join("procmon.toml")
}
