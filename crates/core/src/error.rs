use thiserror::Error;

/// Top-level error type shared by every procmon crate.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// `start_timed_snapshots` was called on a monitor that is already registered.
    #[error("ticker already running")]
    AlreadyRunning,

    #[error("process {0} not found")]
    ProcessNotFound(u32),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;
