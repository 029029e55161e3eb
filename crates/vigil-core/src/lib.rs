//! VIGIL Core
//!
//! Central coordination layer. One Warden owns the managers over a shared
//! database handle, and the control message layer carries UI requests to
//! it.

mod config;
mod control;
mod error;
mod warden;

pub use config::Config;
pub use control::{handle_request, ControlRequest, ControlResponse, SessionStatus};
pub use error::CoreError;
pub use warden::Warden;

// Re-export core components
pub use vigil_filter::{normalize_domain, DomainFilter, FilterMode};
pub use vigil_navigation::{
    format_countdown, interstitial_url, render_interstitial, InterceptEntry, InterceptLog,
    InterstitialContext, NavigationError, NavigationEvent, NavigationHandler,
    NavigationInterceptor, NavigationSource, Verdict,
};
pub use vigil_session::{
    Session, SessionError, SessionLog, SessionLogEntry, SessionManager, SessionOutcome,
    KEY_DOMAINS, KEY_DOMAIN_MODE, KEY_SESSION_ACTIVE, KEY_SESSION_END, KEY_SESSION_START,
    MAX_DURATION_MINUTES, MIN_DURATION_MINUTES,
};
pub use vigil_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging. Logs go to stderr so command output on stdout
/// stays parseable.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
