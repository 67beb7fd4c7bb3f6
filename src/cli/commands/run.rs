//! Run command implementation.
//!
//! Initializes Ollama, writes the status file, then supervises until a
//! shutdown signal arrives.

use crate::core::shutdown;
use crate::core::supervisor::Supervisor;
use crate::models::config::Config;
use crate::Result;
use colored::Colorize;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// Run the supervisor. Exits with failure when initialization fails.
pub async fn run(config: Config) -> Result<ExitCode> {
    let cancel = CancellationToken::new();
    let listener = shutdown::spawn_signal_listener(cancel.clone());

    let mut supervisor = Supervisor::new(config)?;
    let code = run_with(&mut supervisor, &cancel).await;

    cancel.cancel();
    let _ = listener.await;
    Ok(code)
}

/// Drive an already-built supervisor until `cancel` fires.
pub async fn run_with(supervisor: &mut Supervisor, cancel: &CancellationToken) -> ExitCode {
    println!("{}", "Starting Ollama supervisor...".bold().cyan());
    println!();

    let initialized = supervisor.initialize(cancel).await;
    let status = supervisor.write_status().await;

    if cancel.is_cancelled() {
        supervisor.shutdown().await;
        return ExitCode::SUCCESS;
    }

    if !initialized {
        supervisor.release_daemon();
        println!();
        println!(
            "{} Ollama could not be initialized (stage: {})",
            "[FAIL]".red(),
            supervisor.stage()
        );
        return ExitCode::FAILURE;
    }

    println!();
    println!("{} Ollama is ready", "[OK]".green());
    println!("  API:    {}", status.api_url.bold());
    println!("  Model:  {}", status.model.bold());
    println!(
        "  Status: {}",
        supervisor.config().status_file.display().to_string().dimmed()
    );
    println!();
    println!("Press Ctrl-C to stop.");

    supervisor.supervise(cancel).await;
    supervisor.shutdown().await;

    ExitCode::SUCCESS
}
