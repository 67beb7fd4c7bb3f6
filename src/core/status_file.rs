//! Status file persistence.

use crate::models::status::Status;
use crate::Result;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write a status snapshot, replacing any previous file.
pub fn save_status(status: &Status, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(status)?;

    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;

    tracing::debug!("Status written to {:?}", path);
    Ok(())
}

/// Load a status snapshot.
pub fn load_status(path: &Path) -> Result<Status> {
    let content = fs::read_to_string(path)?;
    let status: Status = serde_json::from_str(&content)?;
    Ok(status)
}
