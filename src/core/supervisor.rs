//! Service supervisor.
//!
//! Drives a run through install → start → model pull, writes the status
//! file and keeps watching the daemon until cancelled. Every public
//! operation reports a plain `bool`; failures are logged here and never
//! escape as errors.

use crate::core::status_file;
use crate::models::config::Config;
use crate::models::status::Status;
use crate::services::daemon::{DaemonCli, DaemonHandle, SystemDaemonCli};
use crate::services::installer::{PlatformInstaller, ShellInstaller};
use crate::services::ollama::{contains_model, DaemonApi, OllamaClient};
use crate::{Error, Result};
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Progress of a supervisor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NotStarted,
    CliChecked,
    ServiceStarted,
    ModelReady,
    Initialized,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::NotStarted => "not started",
            Stage::CliChecked => "CLI checked",
            Stage::ServiceStarted => "service started",
            Stage::ModelReady => "model ready",
            Stage::Initialized => "initialized",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Supervises one Ollama daemon and one required model.
pub struct Supervisor {
    config: Config,
    installer: Box<dyn PlatformInstaller>,
    daemon: Box<dyn DaemonCli>,
    api: Box<dyn DaemonApi>,
    process: Option<DaemonHandle>,
    stage: Stage,
}

impl Supervisor {
    /// Create a supervisor using the real CLI, installer and HTTP client.
    pub fn new(config: Config) -> Result<Self> {
        let api = OllamaClient::from_config(&config)?;
        Ok(Self::with_parts(
            config,
            Box::new(ShellInstaller::new()),
            Box::new(SystemDaemonCli::new()),
            Box::new(api),
        ))
    }

    /// Create a supervisor from explicit capabilities.
    pub fn with_parts(
        config: Config,
        installer: Box<dyn PlatformInstaller>,
        daemon: Box<dyn DaemonCli>,
        api: Box<dyn DaemonApi>,
    ) -> Self {
        Self {
            config,
            installer,
            daemon,
            api,
            process: None,
            stage: Stage::NotStarted,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api_url(&self) -> &str {
        self.api.base_url()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// PID of the daemon this supervisor spawned, if any.
    pub fn daemon_pid(&self) -> Option<u32> {
        self.process.as_ref().and_then(DaemonHandle::pid)
    }

    // ========== CLI ==========

    /// Check whether the Ollama CLI is on PATH.
    pub fn is_installed(&self) -> bool {
        self.installer.is_installed()
    }

    /// Install the Ollama CLI for the current platform.
    pub async fn install(&self) -> bool {
        match self.try_install().await {
            Ok(()) => {
                info!("Ollama installed");
                true
            }
            Err(e) => {
                error!("Failed to install Ollama: {}", e);
                false
            }
        }
    }

    async fn try_install(&self) -> Result<()> {
        let platform = self.installer.platform();
        let command = platform
            .install_command(&self.config.install_script_url)
            .ok_or_else(|| Error::UnsupportedPlatform(platform.to_string()))?;

        info!("Installing Ollama for {}", platform);
        self.installer.run_install(&command).await?;

        if !self.installer.is_installed() {
            return Err(Error::NotInstalled);
        }
        Ok(())
    }

    /// Install the CLI unless it is already present.
    pub async fn ensure_installed(&self) -> bool {
        if self.is_installed() {
            debug!("Ollama CLI already installed");
            return true;
        }
        info!("Ollama CLI not found, installing");
        self.install().await
    }

    // ========== Daemon ==========

    /// Probe the daemon's HTTP API.
    pub async fn is_running(&self) -> bool {
        self.api.is_running().await
    }

    /// Check whether the configured model is present on the daemon.
    pub async fn is_model_available(&self) -> bool {
        match self.api.list_models().await {
            Ok(models) => {
                let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
                debug!("Installed models: {}", names.join(", "));
                contains_model(&models, &self.config.model, self.config.model_match)
            }
            Err(e) => {
                debug!("Could not list models: {}", e);
                false
            }
        }
    }

    /// Start the daemon unless it already answers.
    pub async fn start(&mut self, cancel: &CancellationToken) -> bool {
        match self.try_start(cancel).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to start Ollama: {}", e);
                false
            }
        }
    }

    async fn try_start(&mut self, cancel: &CancellationToken) -> Result<()> {
        if self.is_running().await {
            info!("Ollama is already running at {}", self.api_url());
            return Ok(());
        }

        info!(
            "Starting Ollama server (OLLAMA_HOST={})",
            self.config.bind_address
        );
        let handle = self.daemon.spawn_serve(&self.config.bind_address)?;
        if let Some(pid) = handle.pid() {
            info!("Ollama process spawned (pid {})", pid);
        }
        self.process = Some(handle);

        let attempt = self.wait_until_running(cancel).await?;
        info!("Ollama is ready after {} poll(s)", attempt);
        Ok(())
    }

    /// Poll until the daemon answers, the spawned process dies or the
    /// policy runs out.
    async fn wait_until_running(&mut self, cancel: &CancellationToken) -> Result<u32> {
        let policy = self.config.start_policy();

        for attempt in policy.attempts() {
            policy.pause(cancel).await?;

            if self.api.is_running().await {
                return Ok(attempt);
            }
            debug!("Ollama not ready yet ({}/{})", attempt, policy.max_attempts);

            if let Some(status) = self.process.as_mut().and_then(DaemonHandle::exit_status) {
                self.process = None;
                return Err(Error::DaemonExited(status.to_string()));
            }
        }

        Err(policy.exhausted())
    }

    // ========== Model ==========

    /// Pull the configured model unless it is already available.
    pub async fn ensure_model(&self, cancel: &CancellationToken) -> bool {
        if self.is_model_available().await {
            info!("Model {} is available", self.config.model);
            return true;
        }

        match self.pull_model(cancel).await {
            Ok(()) => {
                info!("Model {} downloaded", self.config.model);
                true
            }
            Err(e) => {
                error!("Failed to download model {}: {}", self.config.model, e);
                false
            }
        }
    }

    async fn pull_model(&self, cancel: &CancellationToken) -> Result<()> {
        let timeout = self.config.pull_timeout();
        info!(
            "Downloading model {} (timeout {}s)",
            self.config.model,
            timeout.as_secs()
        );

        tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = tokio::time::timeout(timeout, self.daemon.pull(&self.config.model)) => {
                result.map_err(|_| Error::PullTimeout(timeout))?
            }
        }
    }

    // ========== Status ==========

    /// Take a fresh readiness snapshot.
    pub async fn get_status(&self) -> Status {
        let running = self.is_running().await;
        let available = running && self.is_model_available().await;
        Status::new(running, available, self.api_url(), &self.config.model)
    }

    /// Take a snapshot and write it to the configured status file.
    pub async fn write_status(&self) -> Status {
        let status = self.get_status().await;
        if let Err(e) = status_file::save_status(&status, &self.config.status_file) {
            error!(
                "Failed to write status file {}: {}",
                self.config.status_file.display(),
                e
            );
        }
        status
    }

    // ========== Lifecycle ==========

    /// Run install → start → model, stopping at the first failure.
    pub async fn initialize(&mut self, cancel: &CancellationToken) -> bool {
        info!("Initializing Ollama with model {}", self.config.model);

        let ok = self.run_stages(cancel).await;
        if !ok {
            self.stage = Stage::Failed;
            if cancel.is_cancelled() {
                warn!("Initialization interrupted");
            } else {
                error!("Initialization failed");
            }
        }
        ok
    }

    async fn run_stages(&mut self, cancel: &CancellationToken) -> bool {
        self.stage = Stage::NotStarted;

        if cancel.is_cancelled() || !self.ensure_installed().await {
            return false;
        }
        self.stage = Stage::CliChecked;
        info!("Step 1/3: Ollama CLI available");

        if cancel.is_cancelled() || !self.start(cancel).await {
            return false;
        }
        self.stage = Stage::ServiceStarted;
        info!("Step 2/3: Ollama service running");

        if cancel.is_cancelled() || !self.ensure_model(cancel).await {
            return false;
        }
        self.stage = Stage::ModelReady;
        info!("Step 3/3: Model {} ready", self.config.model);

        if cancel.is_cancelled() {
            return false;
        }
        self.stage = Stage::Initialized;
        info!("Ollama initialized at {}", self.api_url());
        true
    }

    /// Watch the daemon until `cancel` fires.
    ///
    /// Each round rewrites the status file. A daemon that stopped answering
    /// is started again.
    pub async fn supervise(&mut self, cancel: &CancellationToken) {
        let interval = self.config.health_interval();
        info!(
            "Supervising Ollama (health check every {}s)",
            interval.as_secs()
        );

        let mut was_ready = true;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            if !self.is_running().await {
                warn!("Ollama stopped responding, restarting");
                self.release_daemon();
                if !self.start(cancel).await && cancel.is_cancelled() {
                    break;
                }
            }

            let status = self.write_status().await;
            if status.ready != was_ready {
                if status.ready {
                    info!("Ollama is ready again");
                } else {
                    warn!(
                        "Ollama not ready (running: {}, model available: {})",
                        status.ollama_running, status.gemma_available
                    );
                }
                was_ready = status.ready;
            }
        }

        info!("Supervision stopped");
    }

    /// Kill and reap the daemon this supervisor spawned, if any.
    ///
    /// A daemon that was already running before we started is left alone.
    pub fn release_daemon(&mut self) {
        if let Some(mut handle) = self.process.take() {
            handle.terminate();
        }
    }

    /// Stop the daemon we spawned and any other `ollama serve` process.
    pub async fn shutdown(&mut self) {
        info!("Shutting down Ollama");

        self.release_daemon();

        if let Err(e) = self.daemon.terminate_all().await {
            warn!("Failed to stop Ollama processes: {}", e);
        }
    }
}
