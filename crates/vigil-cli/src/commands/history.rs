//! Past-session display.

use chrono::DateTime;

use vigil_core::{SessionLogEntry, Warden};

pub fn run(warden: &Warden, limit: usize) -> anyhow::Result<()> {
    let entries = warden.recent_sessions(limit)?;
    if entries.is_empty() {
        println!("No sessions recorded.");
        return Ok(());
    }

    for entry in &entries {
        println!("  {}", describe(entry));
    }
    Ok(())
}

fn describe(entry: &SessionLogEntry) -> String {
    let started = DateTime::from_timestamp_millis(entry.started_at)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "?".to_string());

    let length = match entry.ended_at {
        Some(ended) => format!("{}m", (ended - entry.started_at).max(0) / 60_000),
        None => "running".to_string(),
    };

    let outcome = entry.outcome.map(|o| o.as_str()).unwrap_or("open");

    format!(
        "{}  {:<5}  {:>7}  {:<9}  {} domain(s)",
        started,
        entry.mode,
        length,
        outcome,
        entry.domains.len()
    )
}
