//! Navigation interception
//!
//! The evaluation order is fixed: scheme gate, session status (which
//! applies lazy expiry), hostname extraction, domain filter. Any failure
//! along the way allows the navigation.

use url::Url;

use vigil_session::SessionManager;

use crate::interstitial::interstitial_url;
use crate::log::InterceptLog;

/// A top-level navigation about to happen
#[derive(Debug, Clone)]
pub struct NavigationEvent {
    pub tab_id: u64,
    pub url: String,
}

/// What to do with a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Let the navigation proceed
    Allow,
    /// Send the tab to the interstitial page instead
    Redirect(String),
}

pub type NavigationHandler = Box<dyn Fn(&NavigationEvent) -> Verdict + Send + Sync>;

/// Source of navigation-start events. Hosts adapt their event plumbing to
/// this so the interceptor can be exercised without a real browser.
pub trait NavigationSource {
    fn on_navigation_start(&mut self, handler: NavigationHandler);
}

pub struct NavigationInterceptor {
    sessions: SessionManager,
    log: InterceptLog,
    interstitial_base: String,
}

impl NavigationInterceptor {
    pub fn new(sessions: SessionManager, log: InterceptLog, interstitial_base: String) -> Self {
        Self {
            sessions,
            log,
            interstitial_base,
        }
    }

    /// Decide a single navigation. Never fails: internal errors are logged
    /// and the navigation proceeds.
    pub fn evaluate(&self, event: &NavigationEvent) -> Verdict {
        if !event.url.starts_with("http") {
            return Verdict::Allow;
        }

        let session = match self.sessions.status() {
            Ok(Some(session)) => session,
            Ok(None) => return Verdict::Allow,
            Err(e) => {
                tracing::error!(url = %event.url, "Session lookup failed: {}", e);
                return Verdict::Allow;
            }
        };

        let hostname = match Url::parse(&event.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
        {
            Some(hostname) => hostname,
            None => return Verdict::Allow,
        };

        if !session.filter().intercepts_hostname(&hostname) {
            return Verdict::Allow;
        }

        let target = match interstitial_url(&self.interstitial_base, &event.url, &hostname) {
            Ok(target) => target,
            Err(e) => {
                tracing::error!("Interstitial URL build failed: {}", e);
                return Verdict::Allow;
            }
        };

        if let Err(e) = self.log.record(&event.url, &hostname) {
            tracing::warn!(url = %event.url, "Intercept log write failed: {}", e);
        }

        tracing::info!(
            tab_id = event.tab_id,
            url = %event.url,
            hostname = %hostname,
            "Intercepted navigation"
        );

        Verdict::Redirect(target)
    }

    /// Register this interceptor's check against an event source
    pub fn attach<S: NavigationSource>(&self, source: &mut S) {
        let interceptor = self.clone();
        source.on_navigation_start(Box::new(move |event| interceptor.evaluate(event)));
    }
}

impl Clone for NavigationInterceptor {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            log: self.log.clone(),
            interstitial_base: self.interstitial_base.clone(),
        }
    }
}
