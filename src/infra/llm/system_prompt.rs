use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{error, info, warn};

/// Reads the system instructions file. A missing or unreadable file yields
/// `None` so generation proceeds without system instructions.
pub fn load_system_prompt(path: Option<&Path>) -> Option<String> {
    let path = path?;
    match fs::read_to_string(path) {
        Ok(contents) => {
            info!(path = %path.display(), "system prompt loaded");
            Some(contents)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "system prompt file not found");
            None
        }
        Err(err) => {
            error!(path = %path.display(), error = %err, "failed to load system prompt");
            None
        }
    }
}
