//! Error types for the supervisor.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the supervisor.
#[derive(Error, Debug)]
pub enum Error {
    // Environment errors
    #[error("Unsupported platform: {0}. Install Ollama manually from https://ollama.com/download")]
    UnsupportedPlatform(String),

    #[error("Ollama installation failed: {0}")]
    InstallFailed(String),

    #[error("Ollama CLI not found in PATH")]
    NotInstalled,

    #[error("Ollama daemon exited before becoming ready: {0}")]
    DaemonExited(String),

    // Timeout errors
    #[error("Ollama did not become ready after {attempts} attempts ({budget:?})")]
    StartTimeout { attempts: u32, budget: Duration },

    #[error("Model pull timed out after {0:?}")]
    PullTimeout(Duration),

    #[error("Model pull failed: {0}")]
    PullFailed(String),

    #[error("Interrupted")]
    Cancelled,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
