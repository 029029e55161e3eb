//! Interstitial page plumbing
//!
//! Blocked tabs land on `<base>?url=<original>&domain=<hostname>`. The
//! page recovers that context from its own URL and renders a countdown
//! against the authoritative end time.

use url::Url;

use crate::error::NavigationError;
use crate::Result;

/// Build the redirect target for a blocked navigation
pub fn interstitial_url(base: &str, original_url: &str, hostname: &str) -> Result<String> {
    let url = Url::parse_with_params(base, &[("url", original_url), ("domain", hostname)])
        .map_err(|_| NavigationError::InvalidUrl(base.to_string()))?;
    Ok(url.to_string())
}

/// Context recovered from an interstitial URL's query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterstitialContext {
    pub blocked_url: Option<String>,
    pub hostname: Option<String>,
}

impl InterstitialContext {
    pub fn from_url(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|_| NavigationError::InvalidUrl(url.to_string()))?;

        let mut blocked_url = None;
        let mut hostname = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "url" => blocked_url = Some(value.into_owned()),
                "domain" => hostname = Some(value.into_owned()),
                _ => {}
            }
        }

        Ok(Self {
            blocked_url,
            hostname,
        })
    }

    /// Only HTTP(S) targets are safe to send the tab back to
    pub fn can_return(&self) -> bool {
        self.blocked_url
            .as_deref()
            .map(|u| u.starts_with("http"))
            .unwrap_or(false)
    }
}

/// Render the interstitial document. While the session runs the page shows
/// a countdown snapshot and reloads every five seconds to resync against
/// the stored end time; once the session is over the page offers the way
/// back, returning automatically after a short delay.
pub fn render_interstitial(context: &InterstitialContext, remaining_ms: Option<i64>) -> String {
    let hostname = context.hostname.as_deref().unwrap_or("This site");
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n");
    out.push_str("<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>VIGIL</title>\n");
    match remaining_ms {
        Some(_) => out.push_str("<meta http-equiv=\"refresh\" content=\"5\">\n"),
        None => {
            if context.can_return() {
                if let Some(url) = context.blocked_url.as_deref() {
                    out.push_str(&format!(
                        "<meta http-equiv=\"refresh\" content=\"3;url={}\">\n",
                        escape_html(url)
                    ));
                }
            }
        }
    }
    out.push_str("</head>\n<body>\n");

    match remaining_ms {
        Some(ms) => {
            out.push_str(&format!(
                "<h1>{} is paused</h1>\n",
                escape_html(hostname)
            ));
            out.push_str("<p>This domain is set aside for the rest of your focus session.</p>\n");
            out.push_str(&format!(
                "<p class=\"countdown\">{}</p>\n",
                format_countdown(ms)
            ));
        }
        None => {
            out.push_str("<h1>Session Ended</h1>\n");
            if context.can_return() {
                if let Some(url) = context.blocked_url.as_deref() {
                    out.push_str(&format!(
                        "<p>Heading back to <a href=\"{}\">{}</a>...</p>\n",
                        escape_html(url),
                        escape_html(hostname)
                    ));
                }
            }
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Countdown text: `H:MM:SS` once hours are involved, `MM:SS` below that
pub fn format_countdown(remaining_ms: i64) -> String {
    let total_seconds = remaining_ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
