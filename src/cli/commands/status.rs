//! Status command implementation.

use crate::core::supervisor::Supervisor;
use crate::models::config::Config;
use crate::preflight;
use crate::Result;
use colored::Colorize;
use std::process::ExitCode;

/// Print readiness checks and write the status file.
pub async fn status(config: Config, json: bool) -> Result<ExitCode> {
    let supervisor = Supervisor::new(config)?;
    status_with(&supervisor, json).await
}

/// Report on an already-built supervisor. Succeeds only when every check
/// passes and the snapshot is ready.
pub async fn status_with(supervisor: &Supervisor, json: bool) -> Result<ExitCode> {
    let report = preflight::run_checks(supervisor).await;
    let status = supervisor.write_status().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("{}", "Checking Ollama...".bold());
        println!();
        report.print(&status);
    }

    Ok(if report.passed() && status.ready {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
