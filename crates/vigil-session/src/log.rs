//! Session log
//!
//! One row per focus session. A row opens when the session starts and is
//! closed with an outcome when it ends, expires, or is replaced by a new
//! session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vigil_filter::FilterMode;
use vigil_storage::Database;

use crate::session::Session;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    /// The session ran its full course
    Completed,
    /// The session was ended early
    Ended,
}

impl SessionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionOutcome::Completed => "completed",
            SessionOutcome::Ended => "ended",
        }
    }
}

impl std::fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionOutcome {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(SessionOutcome::Completed),
            "ended" => Ok(SessionOutcome::Ended),
            _ => Err(format!("Unknown session outcome: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLogEntry {
    pub id: String,
    pub mode: FilterMode,
    pub domains: Vec<String>,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub outcome: Option<SessionOutcome>,
}

pub struct SessionLog {
    db: Database,
}

impl SessionLog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open a row for a freshly started session
    pub fn open(&self, session: &Session) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let domains_json = serde_json::to_string(&session.domains)?;

        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO session_log (id, mode, domains, started_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, session.mode.as_str(), domains_json, session.start_time],
            )?;
            Ok(())
        })?;

        Ok(id)
    }

    /// Close the open row for the session started at `started_at`.
    /// Already-closed rows are left untouched.
    pub fn close(&self, started_at: i64, ended_at: i64, outcome: SessionOutcome) -> Result<()> {
        Ok(self.db.with_connection(|conn| {
            conn.execute(
                "UPDATE session_log SET ended_at = ?1, outcome = ?2
                 WHERE started_at = ?3 AND ended_at IS NULL",
                rusqlite::params![ended_at, outcome.as_str(), started_at],
            )?;
            Ok(())
        })?)
    }

    /// Close any rows still left open, whatever their start time
    pub fn close_open(&self, ended_at: i64, outcome: SessionOutcome) -> Result<()> {
        Ok(self.db.with_connection(|conn| {
            conn.execute(
                "UPDATE session_log SET ended_at = ?1, outcome = ?2 WHERE ended_at IS NULL",
                rusqlite::params![ended_at, outcome.as_str()],
            )?;
            Ok(())
        })?)
    }

    /// Most recent sessions first
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionLogEntry>> {
        Ok(self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, mode, domains, started_at, ended_at, outcome FROM session_log
                 ORDER BY started_at DESC
                 LIMIT ?1",
            )?;

            let entries: Vec<SessionLogEntry> = stmt
                .query_map([limit as i64], |row| {
                    let mode_str: String = row.get(1)?;
                    let domains_json: String = row.get(2)?;
                    let outcome_str: Option<String> = row.get(5)?;

                    Ok(SessionLogEntry {
                        id: row.get(0)?,
                        mode: mode_str.parse().unwrap_or(FilterMode::Block),
                        domains: serde_json::from_str(&domains_json).unwrap_or_default(),
                        started_at: row.get(3)?,
                        ended_at: row.get(4)?,
                        outcome: outcome_str.and_then(|s| s.parse().ok()),
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(entries)
        })?)
    }
}

impl Clone for SessionLog {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
