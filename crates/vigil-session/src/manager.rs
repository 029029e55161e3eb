//! Session controller
//!
//! Owns the persisted state keys. Every operation is a complete
//! read-modify-write against the settings store; surfaces reconcile by
//! re-reading status after each mutation, so concurrent writers are
//! last-write-wins.

use chrono::Utc;
use std::collections::HashMap;
use std::str::FromStr;

use vigil_filter::{normalize_domain, FilterMode};
use vigil_storage::Database;

use crate::error::SessionError;
use crate::log::{SessionLog, SessionOutcome};
use crate::session::{Session, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use crate::Result;

pub const KEY_SESSION_ACTIVE: &str = "isSessionActive";
pub const KEY_SESSION_START: &str = "sessionStartTime";
pub const KEY_SESSION_END: &str = "sessionEndTime";
pub const KEY_DOMAIN_MODE: &str = "domainMode";
pub const KEY_DOMAINS: &str = "domains";

const STATE_KEYS: &[&str] = &[
    KEY_SESSION_ACTIVE,
    KEY_SESSION_START,
    KEY_SESSION_END,
    KEY_DOMAIN_MODE,
    KEY_DOMAINS,
];

pub struct SessionManager {
    db: Database,
    log: SessionLog,
}

impl SessionManager {
    pub fn new(db: Database) -> Self {
        let log = SessionLog::new(db.clone());
        Self { db, log }
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Start a session, replacing any existing one
    pub fn start(
        &self,
        mode: FilterMode,
        domains: Vec<String>,
        duration_minutes: i64,
    ) -> Result<Session> {
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
            return Err(SessionError::InvalidDuration(duration_minutes));
        }

        // Normalize and drop empties; duplicates pass through here and
        // are only screened in add_domain.
        let normalized: Vec<String> = domains
            .iter()
            .filter_map(|raw| normalize_domain(raw))
            .collect();
        if normalized.is_empty() {
            return Err(SessionError::EmptyDomains);
        }

        let now = Utc::now().timestamp_millis();
        let session = Session::new(mode, normalized, now, duration_minutes);

        let start = session.start_time.to_string();
        let end = session.end_time.to_string();
        let domains_json = serde_json::to_string(&session.domains)?;

        self.db.set_settings(&[
            (KEY_SESSION_ACTIVE, "true"),
            (KEY_SESSION_START, &start),
            (KEY_SESSION_END, &end),
            (KEY_DOMAIN_MODE, session.mode.as_str()),
            (KEY_DOMAINS, &domains_json),
        ])?;
        // Settle the log row of any session this start replaces
        self.log.close_open(now, SessionOutcome::Ended)?;
        self.log.open(&session)?;

        tracing::info!(
            mode = %session.mode,
            domain_count = session.domains.len(),
            duration_minutes,
            "Started focus session"
        );

        Ok(session)
    }

    /// End the current session and clear its state. Safe to call when no
    /// session is active.
    pub fn end(&self) -> Result<()> {
        self.end_with_outcome(SessionOutcome::Ended)
    }

    fn end_with_outcome(&self, outcome: SessionOutcome) -> Result<()> {
        let started_at = self
            .db
            .get_setting(KEY_SESSION_START)?
            .and_then(|v| v.parse::<i64>().ok());

        self.db.remove_settings(STATE_KEYS)?;

        if let Some(started_at) = started_at {
            let now = Utc::now().timestamp_millis();
            self.log.close(started_at, now, outcome)?;
        }

        tracing::info!(outcome = %outcome, "Cleared focus session");
        Ok(())
    }

    /// Push the scheduled end out by `minutes`. Returns the new end time,
    /// or None when no session state exists.
    pub fn extend(&self, minutes: i64) -> Result<Option<i64>> {
        let end = match self.read_end_time()? {
            Some(end) => end,
            None => return Ok(None),
        };

        let new_end = end.saturating_add(minutes.saturating_mul(60_000));
        self.db.set_setting(KEY_SESSION_END, &new_end.to_string())?;

        tracing::info!(minutes, new_end, "Extended focus session");
        Ok(Some(new_end))
    }

    /// Pull the scheduled end in by `minutes`, never closer than one minute
    /// from now. Returns the new end time, or None when no session state
    /// exists.
    pub fn reduce(&self, minutes: i64) -> Result<Option<i64>> {
        let end = match self.read_end_time()? {
            Some(end) => end,
            None => return Ok(None),
        };

        let now = Utc::now().timestamp_millis();
        let new_end = end
            .saturating_sub(minutes.saturating_mul(60_000))
            .max(now + 60_000);
        self.db.set_setting(KEY_SESSION_END, &new_end.to_string())?;

        tracing::info!(minutes, new_end, "Reduced focus session");
        Ok(Some(new_end))
    }

    /// The current session, if one is active. Expired sessions are ended
    /// here, on read; unreadable state is cleared the same way.
    pub fn status(&self) -> Result<Option<Session>> {
        let values = self.db.get_settings(STATE_KEYS)?;

        if values.get(KEY_SESSION_ACTIVE).map(String::as_str) != Some("true") {
            return Ok(None);
        }

        let session = match Self::parse_state(&values) {
            Some(session) => session,
            None => {
                tracing::warn!("Active flag set but session state unreadable, clearing");
                self.db.remove_settings(STATE_KEYS)?;
                return Ok(None);
            }
        };

        let now = Utc::now().timestamp_millis();
        if session.is_expired(now) {
            self.end_with_outcome(SessionOutcome::Completed)?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Add one domain to the stored list, creating the list if necessary.
    /// Returns false when the entry is empty or already present.
    pub fn add_domain(&self, raw: &str) -> Result<bool> {
        let domain = match normalize_domain(raw) {
            Some(domain) => domain,
            None => return Ok(false),
        };

        let mut domains: Vec<String> = match self.db.get_setting(KEY_DOMAINS)? {
            Some(json) => serde_json::from_str(&json).unwrap_or_default(),
            None => Vec::new(),
        };

        if domains.iter().any(|d| d.to_lowercase() == domain) {
            return Ok(false);
        }

        domains.push(domain.clone());
        let json = serde_json::to_string(&domains)?;
        self.db.set_setting(KEY_DOMAINS, &json)?;

        tracing::info!(domain = %domain, "Added domain to session list");
        Ok(true)
    }

    fn read_end_time(&self) -> Result<Option<i64>> {
        let raw = match self.db.get_setting(KEY_SESSION_END)? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        match raw.parse::<i64>() {
            Ok(end) => Ok(Some(end)),
            Err(_) => {
                tracing::warn!(value = %raw, "Unreadable session end time, clearing state");
                self.db.remove_settings(STATE_KEYS)?;
                Ok(None)
            }
        }
    }

    fn parse_state(values: &HashMap<String, String>) -> Option<Session> {
        let start_time = values.get(KEY_SESSION_START)?.parse::<i64>().ok()?;
        let end_time = values.get(KEY_SESSION_END)?.parse::<i64>().ok()?;
        let mode = FilterMode::from_str(values.get(KEY_DOMAIN_MODE)?).ok()?;
        let domains: Vec<String> = serde_json::from_str(values.get(KEY_DOMAINS)?).ok()?;

        Some(Session {
            mode,
            domains,
            start_time,
            end_time,
        })
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            log: self.log.clone(),
        }
    }
}
