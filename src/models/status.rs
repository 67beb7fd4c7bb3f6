//! Status snapshot model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Readiness snapshot written to the status file.
///
/// `ready` is always `ollama_running && gemma_available`; build it with
/// [`Status::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Daemon answered `/api/tags`.
    pub ollama_running: bool,
    /// Configured model is present locally.
    pub gemma_available: bool,
    /// API base URL that was probed.
    pub api_url: String,
    /// Configured model identifier.
    pub model: String,
    /// Daemon is running and the model is available.
    pub ready: bool,
    /// When this snapshot was taken.
    pub install_time: DateTime<Utc>,
}

impl Status {
    pub fn new(ollama_running: bool, gemma_available: bool, api_url: &str, model: &str) -> Self {
        Self {
            ollama_running,
            gemma_available,
            api_url: api_url.to_string(),
            model: model.to_string(),
            ready: ollama_running && gemma_available,
            install_time: Utc::now(),
        }
    }
}
