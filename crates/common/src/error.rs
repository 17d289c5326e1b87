//! Error types for SentryBox

use thiserror::Error;

/// Result type alias using SentryBox Error
pub type Result<T> = std::result::Result<T, Error>;

/// SentryBox error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Hypervisor tool not found at {0}")]
    ToolNotFound(String),

    #[error("Hypervisor tool error: {0}")]
    Tool(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Installer error: {0}")]
    Installer(String),

    #[error("Unsupported operating system: {0}")]
    UnsupportedOs(String),

    #[error("Operation timeout after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
