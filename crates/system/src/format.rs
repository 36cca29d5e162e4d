use procmon_core::Report;

/// Format a byte count with binary units (e.g. `"7.3 GiB"`).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [(&str, u64); 3] = [("GiB", 1 << 30), ("MiB", 1 << 20), ("KiB", 1 << 10)];

    UNITS
        .iter()
        .find(|(_, size)| bytes >= *size)
        .map(|(unit, size)| format!("{:.1} {unit}", bytes as f64 / *size as f64))
        .unwrap_or_else(|| format!("{bytes} B"))
}

/// Render a CPU ratio as a percentage of one core; `2.0` becomes `"200.0%"`.
pub fn format_cpu(ratio: f32) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// One-line status summary of a report, for logs and status commands.
pub fn summarize(report: &Report) -> String {
    match report.latest() {
        None => "no samples yet".to_string(),
        Some(latest) => format!(
            "mem {} (peak {}), cpu {} (avg {}) over {} samples",
            format_bytes(latest.memory),
            format_bytes(report.peak_memory().unwrap_or(latest.memory)),
            format_cpu(latest.cpu),
            format_cpu(report.average_cpu()),
            report.len(),
        ),
    }
}
