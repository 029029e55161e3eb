//! Main state container
//!
//! The Warden owns every manager over one shared database handle. All
//! session state lives in storage; the Warden itself holds nothing that
//! could drift from it.

use vigil_filter::FilterMode;
use vigil_navigation::{
    InterceptEntry, InterceptLog, NavigationEvent, NavigationInterceptor, NavigationSource, Verdict,
};
use vigil_session::{Session, SessionLog, SessionLogEntry, SessionManager};
use vigil_storage::Database;

use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

pub struct Warden {
    /// Configuration
    config: Config,
    /// Database
    db: Database,
    /// Session controller
    sessions: SessionManager,
    /// Navigation interceptor
    interceptor: NavigationInterceptor,
    /// Blocked-attempt log
    intercept_log: InterceptLog,
}

impl Warden {
    /// Open (or create) the database at the configured path and wire up
    /// the managers.
    pub fn new(config: Config) -> Result<Self> {
        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::with_database(config, db))
    }

    /// Wire up the managers over an already-open database
    pub fn with_database(config: Config, db: Database) -> Self {
        let sessions = SessionManager::new(db.clone());
        let intercept_log = InterceptLog::new(db.clone());
        let interceptor = NavigationInterceptor::new(
            sessions.clone(),
            intercept_log.clone(),
            config.interstitial_base.clone(),
        );

        Self {
            config,
            db,
            sessions,
            interceptor,
            intercept_log,
        }
    }

    // === Session operations ===

    pub fn session_manager(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn start_session(
        &self,
        mode: FilterMode,
        domains: Vec<String>,
        duration_minutes: i64,
    ) -> Result<Session> {
        Ok(self.sessions.start(mode, domains, duration_minutes)?)
    }

    pub fn end_session(&self) -> Result<()> {
        Ok(self.sessions.end()?)
    }

    pub fn extend_session(&self, minutes: i64) -> Result<Option<i64>> {
        Ok(self.sessions.extend(minutes)?)
    }

    pub fn reduce_session(&self, minutes: i64) -> Result<Option<i64>> {
        Ok(self.sessions.reduce(minutes)?)
    }

    pub fn session_status(&self) -> Result<Option<Session>> {
        Ok(self.sessions.status()?)
    }

    pub fn add_domain(&self, domain: &str) -> Result<bool> {
        Ok(self.sessions.add_domain(domain)?)
    }

    // === Navigation operations ===

    pub fn interceptor(&self) -> &NavigationInterceptor {
        &self.interceptor
    }

    /// Run one URL through the interceptor as if a tab were navigating
    pub fn check_navigation(&self, tab_id: u64, url: &str) -> Verdict {
        self.interceptor.evaluate(&NavigationEvent {
            tab_id,
            url: url.to_string(),
        })
    }

    /// Subscribe the interceptor to a navigation event source
    pub fn attach_to<S: NavigationSource>(&self, source: &mut S) {
        self.interceptor.attach(source);
    }

    pub fn recent_intercepts(&self, limit: usize) -> Result<Vec<InterceptEntry>> {
        Ok(self.intercept_log.recent(limit)?)
    }

    pub fn top_blocked_hostnames(&self, limit: usize) -> Result<Vec<(String, i64)>> {
        Ok(self.intercept_log.top_hostnames(limit)?)
    }

    pub fn clear_intercepts(&self) -> Result<()> {
        Ok(self.intercept_log.clear_all()?)
    }

    // === Session history ===

    pub fn session_log(&self) -> &SessionLog {
        self.sessions.log()
    }

    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionLogEntry>> {
        Ok(self.sessions.log().recent(limit)?)
    }

    // === Config ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Clone for Warden {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            db: self.db.clone(),
            sessions: self.sessions.clone(),
            interceptor: self.interceptor.clone(),
            intercept_log: self.intercept_log.clone(),
        }
    }
}

// Implement std::io::Error conversion for fs operations
impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_warden() -> Warden {
        let config = Config {
            database_path: PathBuf::from(":memory:"),
            interstitial_base: "vigil://blocked".to_string(),
        };
        let db = Database::open_in_memory().unwrap();
        Warden::with_database(config, db)
    }

    #[test]
    fn test_session_through_warden() {
        let warden = test_warden();

        warden
            .start_session(FilterMode::Block, vec!["reddit.com".to_string()], 25)
            .unwrap();

        let session = warden.session_status().unwrap().unwrap();
        assert_eq!(session.mode, FilterMode::Block);

        // The interceptor sees the same state
        assert!(matches!(
            warden.check_navigation(1, "https://reddit.com/"),
            Verdict::Redirect(_)
        ));
        assert_eq!(
            warden.check_navigation(1, "https://docs.rs/"),
            Verdict::Allow
        );

        warden.end_session().unwrap();
        assert!(warden.session_status().unwrap().is_none());
        assert_eq!(
            warden.check_navigation(1, "https://reddit.com/"),
            Verdict::Allow
        );
    }

    #[test]
    fn test_intercepts_visible_through_warden() {
        let warden = test_warden();

        warden
            .start_session(FilterMode::Block, vec!["reddit.com".to_string()], 25)
            .unwrap();
        warden.check_navigation(1, "https://reddit.com/r/rust");

        let entries = warden.recent_intercepts(10).unwrap();
        assert_eq!(entries.len(), 1);

        let top = warden.top_blocked_hostnames(10).unwrap();
        assert_eq!(top[0].0, "reddit.com");

        warden.clear_intercepts().unwrap();
        assert!(warden.recent_intercepts(10).unwrap().is_empty());
    }

    #[test]
    fn test_attach_to_event_source() {
        use vigil_navigation::NavigationHandler;

        struct RecordingSource {
            handler: Option<NavigationHandler>,
        }

        impl NavigationSource for RecordingSource {
            fn on_navigation_start(&mut self, handler: NavigationHandler) {
                self.handler = Some(handler);
            }
        }

        let warden = test_warden();
        warden
            .start_session(FilterMode::Allow, vec!["docs.rs".to_string()], 25)
            .unwrap();

        let mut source = RecordingSource { handler: None };
        warden.attach_to(&mut source);

        let handler = source.handler.expect("handler registered on attach");
        assert_eq!(
            handler(&NavigationEvent {
                tab_id: 7,
                url: "https://docs.rs/serde".to_string(),
            }),
            Verdict::Allow
        );
        assert!(matches!(
            handler(&NavigationEvent {
                tab_id: 7,
                url: "https://reddit.com/".to_string(),
            }),
            Verdict::Redirect(_)
        ));
    }
}
