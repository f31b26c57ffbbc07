//! Task log removal

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Deletes a log file
///
/// A file that is already gone counts as removed. Any other failure yields
/// `false`; nothing is propagated.
pub fn remove_log_file(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            info!("Removed task log: {}", path.display());
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => {
            warn!("Failed to remove task log {}: {}", path.display(), e);
            false
        }
    }
}
