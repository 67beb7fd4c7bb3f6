//! Ollama Supervisor Library
//!
//! Installs, starts and health-checks a local Ollama daemon, keeps a model
//! downloaded and reports readiness through a status file.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;

pub use error::{Error, Result};
