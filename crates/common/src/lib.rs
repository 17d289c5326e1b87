//! SentryBox Common Library
//!
//! Shared types, errors, and configuration for the SentryBox launcher.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::LauncherConfig;
pub use error::{Error, Result};
pub use types::*;

/// SentryBox version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default config directory
pub fn default_config_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".sentrybox")
        .join("config.toml")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(std::path::PathBuf::from)
    }
}
