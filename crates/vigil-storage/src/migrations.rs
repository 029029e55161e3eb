//! Database migrations
//!
//! Schema: settings key-value store, session log, intercept log

use crate::Result;
use rusqlite::{Connection, OptionalExtension};

const SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    if get_schema_version(conn)? < 1 {
        migrate_v1(conn)?;
    }
    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;
    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?;
    // No row yet means a fresh database
    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Applying migration v1: initial schema");

    // Settings table - holds the session state keys
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
    )?;

    // Session log - one row per focus session, closed when it ends
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS session_log (
            id TEXT PRIMARY KEY,
            mode TEXT NOT NULL,
            domains TEXT NOT NULL DEFAULT '[]',
            started_at INTEGER NOT NULL,
            ended_at INTEGER,
            outcome TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_session_log_started ON session_log(started_at);
    "#,
    )?;

    // Intercept log - blocked navigation attempts, one row per URL
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS intercept_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL,
            hostname TEXT NOT NULL,
            blocked_at TEXT NOT NULL,
            hit_count INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_intercept_url ON intercept_log(url);
        CREATE INDEX IF NOT EXISTS idx_intercept_hostname ON intercept_log(hostname);
    "#,
    )?;

    Ok(())
}
