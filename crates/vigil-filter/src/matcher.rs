//! Domain matching
//!
//! Hostname-against-list checks shared by the interceptor and the
//! session controller.

use std::collections::HashSet;
use url::Url;

use crate::FilterMode;

/// Normalize a user-entered domain: trim whitespace, lowercase.
/// Returns None when nothing usable remains.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let domain = raw.trim().to_lowercase();
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

pub struct DomainFilter {
    mode: FilterMode,
    domains: HashSet<String>,
}

impl DomainFilter {
    pub fn new<I>(mode: FilterMode, domains: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let domains = domains
            .into_iter()
            .filter_map(|d| normalize_domain(&d))
            .collect();
        Self { mode, domains }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    /// A hostname matches a listed domain when it equals it or sits below
    /// it: sub.example.com matches example.com, notexample.com does not.
    pub fn matches_hostname(&self, hostname: &str) -> bool {
        let hostname = hostname.to_lowercase();
        self.domains
            .iter()
            .any(|d| hostname == *d || hostname.ends_with(&format!(".{}", d)))
    }

    /// Whether a navigation to this hostname is intercepted under the
    /// current mode.
    pub fn intercepts_hostname(&self, hostname: &str) -> bool {
        let matched = self.matches_hostname(hostname);
        match self.mode {
            FilterMode::Block => matched,
            FilterMode::Allow => !matched,
        }
    }

    /// Check a full URL. Unparsable URLs and URLs without a hostname are
    /// never intercepted.
    pub fn should_intercept(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                return self.intercepts_hostname(host);
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_filter(domains: &[&str]) -> DomainFilter {
        DomainFilter::new(FilterMode::Block, domains.iter().map(|d| d.to_string()))
    }

    fn allow_filter(domains: &[&str]) -> DomainFilter {
        DomainFilter::new(FilterMode::Allow, domains.iter().map(|d| d.to_string()))
    }

    #[test]
    fn test_block_mode() {
        let filter = block_filter(&["tracker.com"]);

        assert!(filter.should_intercept("https://tracker.com/pixel.gif"));
        assert!(filter.should_intercept("https://sub.tracker.com/script.js"));
        assert!(!filter.should_intercept("https://example.com/page"));
    }

    #[test]
    fn test_allow_mode() {
        let filter = allow_filter(&["docs.rs", "github.com"]);

        assert!(!filter.should_intercept("https://docs.rs/serde"));
        assert!(!filter.should_intercept("https://gist.github.com/x"));
        assert!(filter.should_intercept("https://news.example.com/"));
    }

    #[test]
    fn test_suffix_is_not_subdomain() {
        // notexample.com merely ends with "example.com"
        let filter = block_filter(&["example.com"]);

        assert!(filter.matches_hostname("example.com"));
        assert!(filter.matches_hostname("a.b.example.com"));
        assert!(!filter.matches_hostname("notexample.com"));
    }

    #[test]
    fn test_case_insensitive() {
        let filter = block_filter(&["  Example.COM "]);

        assert!(filter.matches_hostname("EXAMPLE.com"));
        assert!(filter.intercepts_hostname("www.Example.Com"));
    }

    #[test]
    fn test_malformed_url_fails_open() {
        // Even in allow mode a URL the parser rejects is left alone
        let filter = allow_filter(&["example.com"]);

        assert!(!filter.should_intercept("not a url"));
        assert!(!filter.should_intercept("data:text/plain,hello"));
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("  Reddit.COM "), Some("reddit.com".into()));
        assert_eq!(normalize_domain("   "), None);
        assert_eq!(normalize_domain(""), None);
    }
}
