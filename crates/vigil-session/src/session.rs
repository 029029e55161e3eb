//! Session data structure

use serde::{Deserialize, Serialize};
use vigil_filter::{DomainFilter, FilterMode};

pub const MIN_DURATION_MINUTES: i64 = 1;
pub const MAX_DURATION_MINUTES: i64 = 480;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Filtering direction for the domain list
    pub mode: FilterMode,
    /// Normalized (lowercase, trimmed) domain list
    pub domains: Vec<String>,
    /// Session start, milliseconds since the Unix epoch
    pub start_time: i64,
    /// Scheduled end, milliseconds since the Unix epoch
    pub end_time: i64,
}

impl Session {
    pub fn new(
        mode: FilterMode,
        domains: Vec<String>,
        start_time: i64,
        duration_minutes: i64,
    ) -> Self {
        Self {
            mode,
            domains,
            start_time,
            end_time: start_time + duration_minutes * 60_000,
        }
    }

    /// A session is expired once its scheduled end is reached
    pub fn is_expired(&self, now: i64) -> bool {
        self.end_time <= now
    }

    /// Milliseconds left, clamped to zero
    pub fn remaining_ms(&self, now: i64) -> i64 {
        (self.end_time - now).max(0)
    }

    /// Build the domain filter this session navigates under
    pub fn filter(&self) -> DomainFilter {
        DomainFilter::new(self.mode, self.domains.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = Session::new(
            FilterMode::Block,
            vec!["reddit.com".to_string()],
            1_000,
            25,
        );
        assert_eq!(session.start_time, 1_000);
        assert_eq!(session.end_time, 1_000 + 25 * 60_000);
    }

    #[test]
    fn test_expiry_boundary() {
        let session = Session::new(FilterMode::Block, vec!["x.com".to_string()], 0, 1);

        assert!(!session.is_expired(59_999));
        assert!(session.is_expired(60_000));
        assert!(session.is_expired(60_001));
    }

    #[test]
    fn test_remaining_clamps_to_zero() {
        let session = Session::new(FilterMode::Allow, vec!["x.com".to_string()], 0, 1);

        assert_eq!(session.remaining_ms(10_000), 50_000);
        assert_eq!(session.remaining_ms(60_000), 0);
        assert_eq!(session.remaining_ms(90_000), 0);
    }

    #[test]
    fn test_filter_follows_mode() {
        let session = Session::new(
            FilterMode::Allow,
            vec!["docs.rs".to_string()],
            0,
            25,
        );
        let filter = session.filter();

        assert!(!filter.intercepts_hostname("docs.rs"));
        assert!(filter.intercepts_hostname("reddit.com"));
    }
}
