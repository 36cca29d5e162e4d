//! procmon — samples its own CPU and memory and logs a rolling report.
//!
//! Run with:  `RUST_LOG=info procmon [path/to/procmon.toml]`

use anyhow::Result;
use procmon_system::{summarize, Monitor, TokioTickPool};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("procmon v{} starting", env!("CARGO_PKG_VERSION"));

    let path = std::env::args()
        .nth(1)
        .map(Into::into)
        .unwrap_or_else(procmon_config::default_path);
    let config = procmon_config::load(&path)?;

    let monitor = Arc::new(Monitor::current_process_with(&config));
    monitor.start_timed_snapshots_with(&TokioTickPool::current(), &config)?;
    tracing::info!("monitor started at {}", monitor.start_time());

    let mut ticker = tokio::time::interval(config.report_interval());
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = monitor.get_report();
                tracing::info!("{}", summarize(&report));
                tracing::debug!("report: {}", serde_json::to_string(&*report)?);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    monitor.stop_timed_snapshots();
    tracing::info!("procmon stopped after {}s", monitor.uptime().num_seconds());
    Ok(())
}
