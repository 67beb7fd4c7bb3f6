//! Stop command implementation.

use crate::services::daemon::{DaemonCli, SystemDaemonCli, SERVE_PATTERN};
use crate::Result;
use colored::Colorize;

/// Terminate every running `ollama serve` process.
pub async fn stop() -> Result<()> {
    println!("Stopping processes matching '{}'...", SERVE_PATTERN);
    SystemDaemonCli::new().terminate_all().await?;
    println!("{}", "Ollama stopped".green());
    Ok(())
}
