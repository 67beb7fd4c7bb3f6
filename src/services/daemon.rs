//! Ollama daemon process control.
//!
//! Spawns `ollama serve` detached from the supervisor, runs `ollama pull`,
//! and terminates daemons by name pattern on shutdown.

use super::installer::OLLAMA_BINARY;
use crate::{Error, Result};
use async_trait::async_trait;
use std::process::{Child, ExitStatus, Stdio};

/// Pattern matched by `pkill -f` on shutdown.
pub const SERVE_PATTERN: &str = "ollama serve";

/// Process-level side of the daemon.
#[async_trait]
pub trait DaemonCli: Send + Sync {
    /// Spawn `ollama serve` with `OLLAMA_HOST` set to `bind_address`.
    fn spawn_serve(&self, bind_address: &str) -> Result<DaemonHandle>;

    /// Run `ollama pull <model>` to completion.
    ///
    /// Dropping the returned future must stop the pull.
    async fn pull(&self, model: &str) -> Result<()>;

    /// Terminate every process matching [`SERVE_PATTERN`].
    async fn terminate_all(&self) -> Result<()>;
}

/// Handle to a spawned daemon.
///
/// The daemon is never waited on while healthy; the handle only lets the
/// supervisor notice an early exit and kill the process it started.
#[derive(Debug)]
pub struct DaemonHandle {
    child: Option<Child>,
    pid: Option<u32>,
}

impl DaemonHandle {
    pub fn from_child(child: Child) -> Self {
        let pid = Some(child.id());
        Self {
            child: Some(child),
            pid,
        }
    }

    /// Handle for a daemon whose process is not owned by us.
    pub fn untracked() -> Self {
        Self {
            child: None,
            pid: None,
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Exit status if the process has already exited.
    pub fn exit_status(&mut self) -> Option<ExitStatus> {
        let child = self.child.as_mut()?;
        match child.try_wait() {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("Failed to poll Ollama process: {}", e);
                None
            }
        }
    }

    /// Kill the owned process, if any, and reap it.
    pub fn terminate(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        if let Err(e) = child.kill() {
            // InvalidInput means the process already exited
            if e.kind() != std::io::ErrorKind::InvalidInput {
                tracing::warn!("Failed to kill Ollama process: {}", e);
            }
        }

        match child.wait() {
            Ok(status) => tracing::info!("Ollama process {} stopped ({})", child.id(), status),
            Err(e) => tracing::warn!("Error waiting for Ollama to exit: {}", e),
        }
    }
}

/// [`DaemonCli`] backed by the real `ollama` and `pkill` executables.
#[derive(Debug, Default)]
pub struct SystemDaemonCli;

impl SystemDaemonCli {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DaemonCli for SystemDaemonCli {
    fn spawn_serve(&self, bind_address: &str) -> Result<DaemonHandle> {
        let mut cmd = std::process::Command::new(OLLAMA_BINARY);
        cmd.arg("serve")
            .env("OLLAMA_HOST", bind_address)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Own process group so terminal signals aimed at us skip the daemon.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd.spawn()?;
        Ok(DaemonHandle::from_child(child))
    }

    async fn pull(&self, model: &str) -> Result<()> {
        let status = tokio::process::Command::new(OLLAMA_BINARY)
            .args(["pull", model])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await?;

        if !status.success() {
            return Err(Error::PullFailed(format!(
                "ollama pull {} exited with {}",
                model, status
            )));
        }
        Ok(())
    }

    async fn terminate_all(&self) -> Result<()> {
        let status = tokio::process::Command::new("pkill")
            .args(["-f", SERVE_PATTERN])
            .status()
            .await?;

        // pkill exits with 1 when nothing matched
        match status.code() {
            Some(0) | Some(1) => Ok(()),
            _ => Err(Error::other(format!("pkill exited with {}", status))),
        }
    }
}
