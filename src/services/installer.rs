//! Ollama CLI detection and installation.

use crate::{Error, Result};
use async_trait::async_trait;
use std::fmt;
use tokio::process::Command;

/// Name of the Ollama executable.
pub const OLLAMA_BINARY: &str = "ollama";

/// Operating system the supervisor runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Other(String),
}

impl Platform {
    /// Detect the current platform.
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value.
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            other => Platform::Other(other.to_string()),
        }
    }

    /// Shell command installing Ollama, or `None` when unsupported.
    pub fn install_command(&self, script_url: &str) -> Option<String> {
        match self {
            Platform::Linux | Platform::MacOs => Some(format!("curl -fsSL {} | sh", script_url)),
            Platform::Windows | Platform::Other(_) => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
            Platform::Other(os) => write!(f, "{}", os),
        }
    }
}

/// Detects and installs the Ollama CLI.
#[async_trait]
pub trait PlatformInstaller: Send + Sync {
    /// Platform this installer acts for.
    fn platform(&self) -> Platform;

    /// `true` when the CLI can be found. Never fails.
    fn is_installed(&self) -> bool;

    /// Run a shell install command to completion.
    async fn run_install(&self, command: &str) -> Result<()>;
}

/// Installer backed by `which` and `sh -c`.
pub struct ShellInstaller {
    platform: Platform,
}

impl ShellInstaller {
    pub fn new() -> Self {
        Self::for_platform(Platform::detect())
    }

    pub fn for_platform(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Default for ShellInstaller {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformInstaller for ShellInstaller {
    fn platform(&self) -> Platform {
        self.platform.clone()
    }

    fn is_installed(&self) -> bool {
        which::which(OLLAMA_BINARY).is_ok()
    }

    async fn run_install(&self, command: &str) -> Result<()> {
        tracing::info!("Running: {}", command);

        let status = Command::new("sh").arg("-c").arg(command).status().await?;

        if !status.success() {
            return Err(Error::InstallFailed(format!(
                "install command exited with {}",
                status
            )));
        }
        Ok(())
    }
}
