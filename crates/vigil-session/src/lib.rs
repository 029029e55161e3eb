//! VIGIL Session Management
//!
//! A focus session is a time-boxed period with a filter mode and a domain
//! list. The manager owns the persisted state keys, applies every mutation
//! as one read-modify-write step, and expires sessions lazily on read.

mod error;
mod log;
mod manager;
mod session;

pub use error::SessionError;
pub use log::{SessionLog, SessionLogEntry, SessionOutcome};
pub use manager::{
    SessionManager, KEY_DOMAINS, KEY_DOMAIN_MODE, KEY_SESSION_ACTIVE, KEY_SESSION_END,
    KEY_SESSION_START,
};
pub use session::{Session, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};

pub type Result<T> = std::result::Result<T, SessionError>;
