//! Session control commands.
//!
//! Mutations go through the control message layer rather than calling the
//! Warden directly, so the CLI exercises the same wire contract every
//! other surface uses. After each mutation the status is re-read; the
//! display never assumes a mutation took effect.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::bail;
use chrono::Utc;

use vigil_core::{
    format_countdown, handle_request, ControlRequest, ControlResponse, FilterMode, SessionStatus,
    Warden,
};

pub fn start(
    warden: &Warden,
    mode: FilterMode,
    duration: i64,
    domains: Vec<String>,
) -> anyhow::Result<()> {
    let request = ControlRequest::StartSession {
        mode,
        domains: split_domains(&domains),
        duration,
    };
    if let ControlResponse::Failure { error } = handle_request(warden, request) {
        bail!(error);
    }

    println!("Focus session started.");
    print_status(&fetch_status(warden)?);
    Ok(())
}

pub fn stop(warden: &Warden) -> anyhow::Result<()> {
    if let ControlResponse::Failure { error } = handle_request(warden, ControlRequest::EndSession) {
        bail!(error);
    }
    println!("Session ended.");
    Ok(())
}

pub fn extend(warden: &Warden, minutes: i64) -> anyhow::Result<()> {
    adjust(warden, ControlRequest::ExtendSession { minutes })
}

pub fn reduce(warden: &Warden, minutes: i64) -> anyhow::Result<()> {
    adjust(warden, ControlRequest::ReduceSession { minutes })
}

fn adjust(warden: &Warden, request: ControlRequest) -> anyhow::Result<()> {
    if let ControlResponse::Failure { error } = handle_request(warden, request) {
        bail!(error);
    }
    print_status(&fetch_status(warden)?);
    Ok(())
}

pub fn status(warden: &Warden, json: bool) -> anyhow::Result<()> {
    if json {
        let response = handle_request(warden, ControlRequest::GetSessionStatus);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    print_status(&fetch_status(warden)?);
    Ok(())
}

pub fn add_domain(warden: &Warden, domain: &str) -> anyhow::Result<()> {
    let request = ControlRequest::AddDomain {
        domain: domain.to_string(),
    };
    if let ControlResponse::Failure { error } = handle_request(warden, request) {
        bail!(error);
    }
    println!("Added {}.", domain.trim());
    Ok(())
}

/// Live countdown. Two mechanisms on purpose: a one-second display tick
/// recomputed locally from the stored end time, and a full status resync
/// every fifth tick (and whenever the local countdown hits zero) that
/// picks up adjustments from other surfaces and applies lazy expiry.
pub fn watch(warden: &Warden) -> anyhow::Result<()> {
    let mut session = match warden.session_status()? {
        Some(session) => session,
        None => {
            println!("No active session.");
            return Ok(());
        }
    };

    println!(
        "{}: {}",
        mode_label(Some(session.mode)),
        session.domains.join(", ")
    );

    let mut tick: u64 = 0;
    loop {
        let now = Utc::now().timestamp_millis();
        let remaining = session.remaining_ms(now);

        print!("\r{}   ", format_countdown(remaining));
        std::io::stdout().flush()?;

        if tick % 5 == 4 || remaining == 0 {
            match warden.session_status()? {
                Some(current) => session = current,
                None => break,
            }
        }

        thread::sleep(Duration::from_secs(1));
        tick += 1;
    }

    println!();
    println!("Session Ended");
    Ok(())
}

fn fetch_status(warden: &Warden) -> anyhow::Result<SessionStatus> {
    match handle_request(warden, ControlRequest::GetSessionStatus) {
        ControlResponse::Status(status) => Ok(status),
        ControlResponse::Failure { error } => bail!(error),
        ControlResponse::Ack { .. } => bail!("Unexpected response to a status request"),
    }
}

fn print_status(status: &SessionStatus) {
    if !status.is_active {
        println!("No active session.");
        return;
    }

    let now = Utc::now().timestamp_millis();
    let remaining = status.end_time.map(|end| end - now).unwrap_or(0);
    println!("{}", format_remaining(remaining));

    let domains = status.domains.as_deref().unwrap_or(&[]).join(", ");
    println!("{}: {}", mode_label(status.mode), domains);
}

fn mode_label(mode: Option<FilterMode>) -> &'static str {
    match mode {
        Some(FilterMode::Allow) => "Allowing only",
        _ => "Blocking",
    }
}

/// Coarse remaining-time text: `2h 5m remaining`, `45m remaining`, or
/// `Session Ended` once the end time has passed.
fn format_remaining(remaining_ms: i64) -> String {
    if remaining_ms <= 0 {
        return "Session Ended".to_string();
    }

    let hours = remaining_ms / 3_600_000;
    let minutes = (remaining_ms % 3_600_000) / 60_000;
    if hours > 0 {
        format!("{}h {}m remaining", hours, minutes)
    } else {
        format!("{}m remaining", minutes)
    }
}

/// Domains arrive as positional arguments, each possibly holding a
/// comma-separated list.
fn split_domains(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|chunk| chunk.split(','))
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "Session Ended");
        assert_eq!(format_remaining(-5_000), "Session Ended");
        assert_eq!(format_remaining(59_000), "0m remaining");
        assert_eq!(format_remaining(45 * 60_000), "45m remaining");
        assert_eq!(format_remaining(3_600_000), "1h 0m remaining");
        assert_eq!(format_remaining(2 * 3_600_000 + 5 * 60_000), "2h 5m remaining");
    }

    #[test]
    fn test_split_domains() {
        let args = vec![
            "reddit.com,x.com".to_string(),
            " news.ycombinator.com ".to_string(),
        ];
        assert_eq!(
            split_domains(&args),
            vec!["reddit.com", "x.com", "news.ycombinator.com"]
        );

        let args = vec!["a.com,,b.com".to_string()];
        assert_eq!(split_domains(&args), vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_mode_label() {
        assert_eq!(mode_label(Some(FilterMode::Allow)), "Allowing only");
        assert_eq!(mode_label(Some(FilterMode::Block)), "Blocking");
        assert_eq!(mode_label(None), "Blocking");
    }
}
