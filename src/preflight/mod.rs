//! Readiness checks shown by `ollama-supervisor status`.

mod cli;
mod ollama;

use crate::core::supervisor::Supervisor;
use crate::models::status::Status;
use colored::Colorize;

/// Outcome of one readiness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: &'static str,
    pub message: String,
    /// Remedy to print; `None` when the check passed.
    pub hint: Option<String>,
}

impl CheckResult {
    pub fn passed(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
            hint: None,
        }
    }

    pub fn failed(name: &'static str, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.hint.is_none()
    }
}

/// All checks for one supervisor, in display order.
#[derive(Debug, Default)]
pub struct Report {
    pub checks: Vec<CheckResult>,
}

impl Report {
    /// `true` when every check passed.
    pub fn passed(&self) -> bool {
        self.checks.iter().all(CheckResult::success)
    }

    /// Look a check up by name.
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Print the checks followed by the readiness verdict for `status`.
    pub fn print(&self, status: &Status) {
        let width = self.checks.iter().map(|c| c.name.len()).max().unwrap_or(0);

        for check in &self.checks {
            let mark = if check.success() {
                "ok".green()
            } else {
                "!!".red()
            };
            let name = format!("{:<width$}", check.name, width = width);
            println!("  {} {}  {}", mark, name.bold(), check.message);
            if let Some(ref hint) = check.hint {
                println!("     {:<width$}  {} {}", "", "->".yellow(), hint, width = width);
            }
        }

        println!();
        let verdict = if status.ready && self.passed() {
            "ready".green().bold()
        } else {
            "not ready".red().bold()
        };
        println!("{} {} ({})", status.model.bold(), verdict, status.api_url);
    }
}

/// Run all readiness checks.
pub async fn run_checks(supervisor: &Supervisor) -> Report {
    let mut checks = vec![cli::check(supervisor)];
    checks.extend(ollama::check(supervisor).await);
    Report { checks }
}
