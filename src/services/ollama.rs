//! Ollama API client.
//!
//! Only the `/api/tags` endpoint is used: it doubles as the health probe and
//! as the list of locally downloaded models.

use crate::models::config::{Config, ModelMatch};
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Models list response.
#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

/// Model information.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub name: String,
}

/// HTTP side of the daemon.
#[async_trait]
pub trait DaemonApi: Send + Sync {
    /// Base URL being probed.
    fn base_url(&self) -> &str;

    /// `true` when the daemon answers `/api/tags` successfully.
    async fn is_running(&self) -> bool;

    /// Models known to the daemon.
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}

/// Check whether `models` contains `wanted` under `policy`.
pub fn contains_model(models: &[ModelInfo], wanted: &str, policy: ModelMatch) -> bool {
    models.iter().any(|m| policy.matches(wanted, &m.name))
}

/// Ollama API client.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a client for the configured API URL.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, config.probe_timeout())
    }

    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url)
    }
}

#[async_trait]
impl DaemonApi for OllamaClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn is_running(&self) -> bool {
        match self.client.get(self.tags_url()).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!("Ollama probe failed: {}", e);
                false
            }
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let resp: ModelsResponse = self
            .client
            .get(self.tags_url())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.models)
    }
}
