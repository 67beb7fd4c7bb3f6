//! Ollama CLI check.

use super::CheckResult;
use crate::core::supervisor::Supervisor;

pub const NAME: &str = "Ollama CLI";

/// Check if the Ollama CLI is installed.
pub fn check(supervisor: &Supervisor) -> CheckResult {
    if supervisor.is_installed() {
        CheckResult::passed(NAME, "installed")
    } else {
        CheckResult::failed(
            NAME,
            "not found",
            "Install Ollama: curl -fsSL https://ollama.com/install.sh | sh",
        )
    }
}
