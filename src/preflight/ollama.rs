//! Ollama daemon and model checks.

use super::CheckResult;
use crate::core::supervisor::Supervisor;

pub const DAEMON: &str = "Ollama";
pub const MODEL: &str = "Model";

/// Check that the daemon answers and the configured model is present.
pub async fn check(supervisor: &Supervisor) -> Vec<CheckResult> {
    let model = supervisor.model();

    if !supervisor.is_running().await {
        return vec![
            CheckResult::failed(DAEMON, "not running", "Start Ollama: ollama serve"),
            CheckResult::failed(
                MODEL,
                format!("{} unknown (service down)", model),
                "Run ollama-supervisor to start the service",
            ),
        ];
    }

    let running = CheckResult::passed(DAEMON, format!("running at {}", supervisor.api_url()));
    let model_check = if supervisor.is_model_available().await {
        CheckResult::passed(MODEL, format!("{} available", model))
    } else {
        CheckResult::failed(
            MODEL,
            format!("{} not found", model),
            format!("Pull the model: ollama pull {}", model),
        )
    };

    vec![running, model_check]
}
