//! SQLite handle and the settings key-value API
//!
//! One connection shared by every manager. The session contract keys all
//! live in the `settings` table as TEXT; multi-key state changes go through
//! the batched variants so a reader never observes half a session.

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::migrations::run_migrations;
use crate::Result;

const UPSERT_SETTING: &str =
    "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)";

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (creating if needed) the database file and bring the schema up
    /// to date.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        // WAL so a watch loop reading status never blocks a writer
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        Self::bootstrap(conn)
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `op` while holding the connection lock
    pub fn with_connection<F, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        op(&conn)
    }

    /// Run `op` inside a transaction; commits only when `op` succeeds
    pub fn transaction<F, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let value = op(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()?)
        })
    }

    /// Read several keys under one lock acquisition; keys with no stored
    /// value are simply absent from the returned map.
    pub fn get_settings(&self, keys: &[&str]) -> Result<HashMap<String, String>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
            let mut values = HashMap::new();
            for key in keys {
                let value: Option<String> = stmt.query_row([key], |row| row.get(0)).optional()?;
                if let Some(value) = value {
                    values.insert((*key).to_string(), value);
                }
            }
            Ok(values)
        })
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.with_connection(|conn| {
            conn.execute(UPSERT_SETTING, rusqlite::params![key, value, updated_at])?;
            Ok(())
        })
    }

    /// Write several keys atomically
    pub fn set_settings(&self, entries: &[(&str, &str)]) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.transaction(|conn| {
            let mut stmt = conn.prepare(UPSERT_SETTING)?;
            for (key, value) in entries {
                stmt.execute(rusqlite::params![key, value, updated_at])?;
            }
            Ok(())
        })
    }

    pub fn remove_setting(&self, key: &str) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
            Ok(())
        })
    }

    /// Remove several keys atomically; absent keys are not an error
    pub fn remove_settings(&self, keys: &[&str]) -> Result<()> {
        self.transaction(|conn| {
            let mut stmt = conn.prepare("DELETE FROM settings WHERE key = ?1")?;
            for key in keys {
                stmt.execute([key])?;
            }
            Ok(())
        })
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            let count: i32 =
                conn.query_row("SELECT COUNT(*) FROM session_log", [], |row| row.get(0))?;
            assert_eq!(count, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_setting_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_setting("domainMode").unwrap(), None);

        db.set_setting("domainMode", "block").unwrap();
        assert_eq!(
            db.get_setting("domainMode").unwrap().as_deref(),
            Some("block")
        );

        db.remove_setting("domainMode").unwrap();
        assert_eq!(db.get_setting("domainMode").unwrap(), None);
    }

    #[test]
    fn test_batched_settings() {
        let db = Database::open_in_memory().unwrap();
        db.set_settings(&[("isSessionActive", "true"), ("sessionStartTime", "1000")])
            .unwrap();

        let values = db
            .get_settings(&["isSessionActive", "sessionStartTime", "missing"])
            .unwrap();
        assert_eq!(
            values.get("isSessionActive").map(String::as_str),
            Some("true")
        );
        assert_eq!(
            values.get("sessionStartTime").map(String::as_str),
            Some("1000")
        );
        assert!(!values.contains_key("missing"));

        db.remove_settings(&["isSessionActive", "sessionStartTime"])
            .unwrap();
        assert_eq!(db.get_setting("isSessionActive").unwrap(), None);
    }
}
