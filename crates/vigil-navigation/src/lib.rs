//! VIGIL Navigation Interception
//!
//! Watches navigation-start events while a session is active and redirects
//! intercepted targets to the interstitial page. Only HTTP(S) navigations
//! are considered; everything else passes through untouched.

mod error;
mod interceptor;
mod interstitial;
mod log;

pub use error::NavigationError;
pub use interceptor::{
    NavigationEvent, NavigationHandler, NavigationInterceptor, NavigationSource, Verdict,
};
pub use interstitial::{
    format_countdown, interstitial_url, render_interstitial, InterstitialContext,
};
pub use log::{InterceptEntry, InterceptLog};

pub type Result<T> = std::result::Result<T, NavigationError>;
