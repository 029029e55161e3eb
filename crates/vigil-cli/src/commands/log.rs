//! Intercepted-navigation log display.

use vigil_core::Warden;

pub fn run(warden: &Warden, limit: usize, clear: bool) -> anyhow::Result<()> {
    if clear {
        warden.clear_intercepts()?;
        println!("Intercept log cleared.");
        return Ok(());
    }

    let entries = warden.recent_intercepts(limit)?;
    if entries.is_empty() {
        println!("No intercepted navigations.");
        return Ok(());
    }

    println!("Recent intercepts:");
    for entry in &entries {
        println!(
            "  {}  {:>3}x  {}",
            entry.blocked_at.format("%Y-%m-%d %H:%M:%S"),
            entry.hit_count,
            entry.url
        );
    }

    let top = warden.top_blocked_hostnames(5)?;
    if !top.is_empty() {
        println!();
        println!("Top hostnames:");
        for (hostname, hits) in &top {
            println!("  {:>4}  {}", hits, hostname);
        }
    }

    Ok(())
}
