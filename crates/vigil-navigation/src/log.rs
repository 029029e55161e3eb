//! Intercept log
//!
//! Blocked navigation attempts, one row per URL with a hit counter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;
use vigil_storage::Database;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptEntry {
    pub id: i64,
    pub url: String,
    pub hostname: String,
    pub blocked_at: DateTime<Utc>,
    pub hit_count: i32,
}

pub struct InterceptLog {
    db: Database,
}

impl InterceptLog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record a blocked attempt against a URL
    pub fn record(&self, url: &str, hostname: &str) -> Result<()> {
        Ok(self.db.with_connection(|conn| {
            let existing: Option<i64> = conn
                .query_row("SELECT id FROM intercept_log WHERE url = ?1", [url], |row| {
                    row.get(0)
                })
                .ok();

            if let Some(id) = existing {
                conn.execute(
                    "UPDATE intercept_log
                     SET blocked_at = ?1, hit_count = hit_count + 1
                     WHERE id = ?2",
                    rusqlite::params![Utc::now().to_rfc3339(), id],
                )?;
            } else {
                conn.execute(
                    "INSERT INTO intercept_log (url, hostname, blocked_at, hit_count)
                     VALUES (?1, ?2, ?3, 1)",
                    rusqlite::params![url, hostname, Utc::now().to_rfc3339()],
                )?;
            }

            Ok(())
        })?)
    }

    /// Most recently blocked first
    pub fn recent(&self, limit: usize) -> Result<Vec<InterceptEntry>> {
        Ok(self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, url, hostname, blocked_at, hit_count FROM intercept_log
                 ORDER BY blocked_at DESC
                 LIMIT ?1",
            )?;

            let entries: Vec<InterceptEntry> = stmt
                .query_map([limit as i64], |row| {
                    let blocked_str: String = row.get(3)?;
                    let blocked_at = DateTime::parse_from_rfc3339(&blocked_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now());

                    Ok(InterceptEntry {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        hostname: row.get(2)?,
                        blocked_at,
                        hit_count: row.get(4)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(entries)
        })?)
    }

    /// Hostnames ranked by total blocked attempts
    pub fn top_hostnames(&self, limit: usize) -> Result<Vec<(String, i64)>> {
        Ok(self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT hostname, SUM(hit_count) AS hits FROM intercept_log
                 GROUP BY hostname
                 ORDER BY hits DESC
                 LIMIT ?1",
            )?;

            let rows: Vec<(String, i64)> = stmt
                .query_map([limit as i64], |row| Ok((row.get(0)?, row.get(1)?)))?
                .filter_map(|r| r.ok())
                .collect();

            Ok(rows)
        })?)
    }

    /// Clear all recorded attempts
    pub fn clear_all(&self) -> Result<()> {
        Ok(self.db.with_connection(|conn| {
            conn.execute("DELETE FROM intercept_log", [])?;
            Ok(())
        })?)
    }
}

impl Clone for InterceptLog {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
