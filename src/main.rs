//! Ollama Supervisor CLI
//!
//! Keeps a local Ollama daemon running with the required model available.

use clap::Parser;
use ollama_supervisor::cli::{
    args::{Cli, Commands},
    commands::{run, status, stop},
};
use ollama_supervisor::models::config;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = config::load_config(cli.config.as_deref())?;

    // Run the appropriate command
    let code = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run::run(config).await?,
        Commands::Status { json } => status::status(config, json).await?,
        Commands::Stop => {
            stop::stop().await?;
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_filter = if verbose {
        "ollama_supervisor=debug"
    } else {
        "ollama_supervisor=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
