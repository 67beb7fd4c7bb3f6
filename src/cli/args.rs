//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ollama Supervisor - keep a local Ollama daemon and model ready
#[derive(Parser, Debug)]
#[command(name = "ollama-supervisor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config.toml
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Defaults to `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install, start and supervise Ollama until interrupted
    Run,

    /// Check readiness and write the status file
    Status {
        /// Print the status record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stop any running Ollama daemon
    Stop,
}
