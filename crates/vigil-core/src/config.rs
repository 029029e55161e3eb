//! Warden configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Base URL intercepted tabs are redirected to
    pub interstitial_base: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("vigil.db"),
            interstitial_base: "vigil://blocked".to_string(),
        }
    }

    /// Platform-local data directory; falls back to `.vigil` under the
    /// working directory when the platform gives us nothing.
    pub fn data_dir() -> PathBuf {
        platform_data_dir()
            .map(|dir| dir.join("VIGIL"))
            .unwrap_or_else(|| PathBuf::from(".vigil"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

#[cfg(target_os = "windows")]
fn platform_data_dir() -> Option<PathBuf> {
    std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
}

#[cfg(target_os = "macos")]
fn platform_data_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join("Library/Application Support"))
}

#[cfg(target_os = "linux")]
fn platform_data_dir() -> Option<PathBuf> {
    std::env::var("XDG_DATA_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".local/share"))
        })
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn platform_data_dir() -> Option<PathBuf> {
    None
}
