//! External services: the Ollama HTTP API, CLI and installer.

pub mod daemon;
pub mod installer;
pub mod ollama;
