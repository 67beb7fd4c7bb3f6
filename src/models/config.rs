//! Configuration model.
//!
//! Configuration is read from `config.toml` and can be overridden via
//! environment variables:
//! - `OLLAMA_SUPERVISOR_API_URL`: Ollama API URL (default: http://localhost:11434)
//! - `OLLAMA_SUPERVISOR_MODEL`: Model to keep available (default: gemma3:4b)
//! - `OLLAMA_SUPERVISOR_MODEL_MATCH`: `family` or `exact` (default: family)
//! - `OLLAMA_SUPERVISOR_BIND`: `OLLAMA_HOST` given to the daemon (default: 0.0.0.0:11434)
//! - `OLLAMA_SUPERVISOR_STATUS_FILE`: Status file path (default: ollama-status.json)
//! - `OLLAMA_SUPERVISOR_PULL_TIMEOUT`: Pull timeout in seconds (default: 600)

use crate::core::retry::RetryPolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const ENV_PREFIX: &str = "OLLAMA_SUPERVISOR_";

/// How a listed model name is compared with the configured model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelMatch {
    /// Name contains the full identifier or its family (`gemma3` for `gemma3:4b`).
    #[default]
    Family,
    /// Name equals the identifier (`<id>:latest` counts for untagged identifiers).
    Exact,
}

impl ModelMatch {
    /// Check whether `listed` satisfies `wanted` under this policy.
    pub fn matches(self, wanted: &str, listed: &str) -> bool {
        match self {
            ModelMatch::Family => listed.contains(wanted) || listed.contains(model_family(wanted)),
            ModelMatch::Exact => {
                listed == wanted || (!wanted.contains(':') && listed == format!("{}:latest", wanted))
            }
        }
    }
}

impl FromStr for ModelMatch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "family" => Ok(ModelMatch::Family),
            "exact" => Ok(ModelMatch::Exact),
            other => Err(Error::Config(format!(
                "unknown model match policy '{}' (expected 'family' or 'exact')",
                other
            ))),
        }
    }
}

/// Family part of a model identifier (`gemma3:4b` -> `gemma3`).
pub fn model_family(model: &str) -> &str {
    model.split(':').next().unwrap_or(model)
}

/// Supervisor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Ollama HTTP API.
    pub api_url: String,
    /// Model that must be available locally.
    pub model: String,
    /// Model matching policy.
    pub model_match: ModelMatch,
    /// Value of `OLLAMA_HOST` for the spawned daemon.
    pub bind_address: String,
    /// Where the status snapshot is written.
    pub status_file: PathBuf,
    /// Vendor install script, piped to `sh`.
    pub install_script_url: String,
    /// HTTP timeout for a single probe, in seconds.
    pub probe_timeout_secs: u64,
    /// Seconds between readiness polls after spawning the daemon.
    pub start_interval_secs: u64,
    /// Readiness polls before giving up.
    pub start_max_attempts: u32,
    /// Model pull timeout in seconds.
    pub pull_timeout_secs: u64,
    /// Seconds between health checks while supervising.
    pub health_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:11434".to_string(),
            model: "gemma3:4b".to_string(),
            model_match: ModelMatch::Family,
            bind_address: "0.0.0.0:11434".to_string(),
            status_file: PathBuf::from("ollama-status.json"),
            install_script_url: "https://ollama.com/install.sh".to_string(),
            probe_timeout_secs: 5,
            start_interval_secs: 2,
            start_max_attempts: 15,
            pull_timeout_secs: 600,
            health_interval_secs: 30,
        }
    }
}

impl Config {
    /// Retry policy used while waiting for a freshly spawned daemon.
    pub fn start_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_secs(self.start_interval_secs),
            self.start_max_attempts,
        )
    }

    pub fn pull_timeout(&self) -> Duration {
        Duration::from_secs(self.pull_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs)
    }

    /// Apply `OLLAMA_SUPERVISOR_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    /// Apply overrides from an arbitrary lookup.
    /// Extracted for testability without mutating environment variables.
    pub(crate) fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("API_URL") {
            self.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("MODEL") {
            self.model = model;
        }
        if let Some(policy) = lookup("MODEL_MATCH") {
            self.model_match = policy.parse()?;
        }
        if let Some(bind) = lookup("BIND") {
            self.bind_address = bind;
        }
        if let Some(path) = lookup("STATUS_FILE") {
            self.status_file = PathBuf::from(path);
        }
        if let Some(secs) = lookup("PULL_TIMEOUT") {
            self.pull_timeout_secs = secs
                .parse()
                .map_err(|_| Error::Config(format!("invalid pull timeout '{}'", secs)))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::Config("model must not be empty".to_string()));
        }
        if model_family(&self.model).trim().is_empty() {
            return Err(Error::Config(format!(
                "model '{}' has no family name before ':'",
                self.model
            )));
        }
        if self.start_max_attempts == 0 {
            return Err(Error::Config("start_max_attempts must be at least 1".to_string()));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        Ok(())
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ollama_supervisor")
}

/// Default location of `config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_config_path().join("config.toml")
}

/// Parse a configuration file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Load configuration.
///
/// An explicit path must exist and parse. Without one, the default location
/// is used when present and defaults otherwise. Environment overrides are
/// applied last.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => load_config_from(path)?,
        None => {
            let path = default_config_path();
            if path.exists() {
                load_config_from(&path)?
            } else {
                Config::default()
            }
        }
    };

    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}
