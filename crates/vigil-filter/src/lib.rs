//! VIGIL Domain Filtering
//!
//! The pure decision layer: which hostnames fall under a session's domain
//! list, and whether that means the navigation is intercepted. Allow mode
//! intercepts everything off the list, block mode intercepts the list.

mod matcher;
mod mode;

pub use matcher::{normalize_domain, DomainFilter};
pub use mode::FilterMode;
