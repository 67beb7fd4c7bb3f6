//! Shared fakes for supervisor integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use ollama_supervisor::models::config::Config;
use ollama_supervisor::services::daemon::{DaemonCli, DaemonHandle};
use ollama_supervisor::services::installer::{Platform, PlatformInstaller};
use ollama_supervisor::services::ollama::{DaemonApi, ModelInfo};
use ollama_supervisor::{Error, Result};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Models known to the fake daemon. `None` makes listing fail.
pub type SharedModels = Arc<Mutex<Option<Vec<String>>>>;

pub fn shared_models(names: &[&str]) -> SharedModels {
    Arc::new(Mutex::new(Some(names.iter().map(|n| n.to_string()).collect())))
}

/// Config pointing the status file into `dir`.
pub fn test_config(dir: &Path) -> Config {
    Config {
        status_file: dir.join("ollama-status.json"),
        ..Config::default()
    }
}

// ========== INSTALLER ==========

#[derive(Clone)]
pub struct FakeInstaller {
    pub platform: Platform,
    pub installed: Arc<AtomicBool>,
    pub install_calls: Arc<AtomicU32>,
    /// Whether a successful install makes the CLI visible.
    pub install_provides_cli: bool,
    pub install_fails: bool,
}

impl FakeInstaller {
    pub fn installed() -> Self {
        Self::new(Platform::Linux, true)
    }

    pub fn missing(platform: Platform) -> Self {
        Self::new(platform, false)
    }

    fn new(platform: Platform, installed: bool) -> Self {
        Self {
            platform,
            installed: Arc::new(AtomicBool::new(installed)),
            install_calls: Arc::new(AtomicU32::new(0)),
            install_provides_cli: true,
            install_fails: false,
        }
    }

    pub fn install_calls(&self) -> u32 {
        self.install_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlatformInstaller for FakeInstaller {
    fn platform(&self) -> Platform {
        self.platform.clone()
    }

    fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    async fn run_install(&self, _command: &str) -> Result<()> {
        self.install_calls.fetch_add(1, Ordering::SeqCst);
        if self.install_fails {
            return Err(Error::InstallFailed("exit status: 1".to_string()));
        }
        if self.install_provides_cli {
            self.installed.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

// ========== DAEMON CLI ==========

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PullBehavior {
    Succeed,
    Fail,
    Hang,
}

#[derive(Clone)]
pub struct FakeDaemonCli {
    pub models: SharedModels,
    pub pull: PullBehavior,
    pub spawn_fails: bool,
    /// Exit immediately after spawning (unix only).
    pub spawn_exits: bool,
    /// Spawn a real long-lived `sleep` process (unix only).
    pub spawn_sleeps: bool,
    pub spawned_pids: Arc<Mutex<Vec<u32>>>,
    pub spawn_calls: Arc<AtomicU32>,
    pub pull_calls: Arc<AtomicU32>,
    pub terminate_calls: Arc<AtomicU32>,
}

impl FakeDaemonCli {
    pub fn new(models: SharedModels) -> Self {
        Self {
            models,
            pull: PullBehavior::Succeed,
            spawn_fails: false,
            spawn_exits: false,
            spawn_sleeps: false,
            spawned_pids: Arc::new(Mutex::new(Vec::new())),
            spawn_calls: Arc::new(AtomicU32::new(0)),
            pull_calls: Arc::new(AtomicU32::new(0)),
            terminate_calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn spawn_calls(&self) -> u32 {
        self.spawn_calls.load(Ordering::SeqCst)
    }

    pub fn pull_calls(&self) -> u32 {
        self.pull_calls.load(Ordering::SeqCst)
    }

    pub fn terminate_calls(&self) -> u32 {
        self.terminate_calls.load(Ordering::SeqCst)
    }

    pub fn spawned_pids(&self) -> Vec<u32> {
        self.spawned_pids.lock().unwrap().clone()
    }
}

/// Whether a process with `pid` still exists (unix only).
#[cfg(unix)]
pub fn process_alive(pid: u32) -> bool {
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[async_trait]
impl DaemonCli for FakeDaemonCli {
    fn spawn_serve(&self, _bind_address: &str) -> Result<DaemonHandle> {
        self.spawn_calls.fetch_add(1, Ordering::SeqCst);
        if self.spawn_fails {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "ollama: not found",
            )));
        }

        #[cfg(unix)]
        {
            if self.spawn_exits {
                let mut child = std::process::Command::new("false").spawn()?;
                child.wait()?;
                return Ok(DaemonHandle::from_child(child));
            }
            if self.spawn_sleeps {
                let child = std::process::Command::new("sleep").arg("300").spawn()?;
                self.spawned_pids.lock().unwrap().push(child.id());
                return Ok(DaemonHandle::from_child(child));
            }
        }

        Ok(DaemonHandle::untracked())
    }

    async fn pull(&self, model: &str) -> Result<()> {
        self.pull_calls.fetch_add(1, Ordering::SeqCst);
        match self.pull {
            PullBehavior::Succeed => {
                if let Some(models) = self.models.lock().unwrap().as_mut() {
                    models.push(model.to_string());
                }
                Ok(())
            }
            PullBehavior::Fail => Err(Error::PullFailed(format!(
                "ollama pull {} exited with exit status: 1",
                model
            ))),
            PullBehavior::Hang => std::future::pending().await,
        }
    }

    async fn terminate_all(&self) -> Result<()> {
        self.terminate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ========== HTTP API ==========

#[derive(Clone)]
pub struct FakeApi {
    pub models: SharedModels,
    /// Probe index (0-based) from which the daemon answers. `u32::MAX` never.
    pub ready_after: Arc<AtomicU32>,
    /// Answers consumed before `ready_after` applies.
    pub script: Arc<Mutex<VecDeque<bool>>>,
    pub probes: Arc<AtomicU32>,
}

impl FakeApi {
    pub fn new(models: SharedModels, ready_after: u32) -> Self {
        Self {
            models,
            ready_after: Arc::new(AtomicU32::new(ready_after)),
            script: Arc::new(Mutex::new(VecDeque::new())),
            probes: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Answer probes from `answers` in order, then report running.
    pub fn scripted(models: SharedModels, answers: &[bool]) -> Self {
        let api = Self::new(models, 0);
        api.script.lock().unwrap().extend(answers.iter().copied());
        api
    }

    pub fn running(models: SharedModels) -> Self {
        Self::new(models, 0)
    }

    pub fn down(models: SharedModels) -> Self {
        Self::new(models, u32::MAX)
    }

    pub fn probes(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DaemonApi for FakeApi {
    fn base_url(&self) -> &str {
        "http://fake-ollama:11434"
    }

    async fn is_running(&self) -> bool {
        let n = self.probes.fetch_add(1, Ordering::SeqCst);
        if let Some(answer) = self.script.lock().unwrap().pop_front() {
            return answer;
        }
        n >= self.ready_after.load(Ordering::SeqCst)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        match self.models.lock().unwrap().as_ref() {
            Some(names) => Ok(names
                .iter()
                .map(|name| ModelInfo { name: name.clone() })
                .collect()),
            None => Err(Error::other("unexpected response")),
        }
    }
}
