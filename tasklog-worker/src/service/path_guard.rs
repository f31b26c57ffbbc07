//! Path guard service
//!
//! The log server may only touch `.log` files below the worker's log root.

use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Suffix every accessible log file must carry
pub const LOG_FILE_SUFFIX: &str = ".log";

/// Validates requested paths against the configured log root
#[derive(Debug, Clone)]
pub struct PathGuard {
    log_root: PathBuf,
}

impl PathGuard {
    /// Creates a guard bound to `log_root`
    ///
    /// # Arguments
    /// * `log_root` - Absolute directory all accepted paths must live under
    pub fn new(log_root: impl Into<PathBuf>) -> Self {
        Self {
            log_root: log_root.into(),
        }
    }

    /// The directory this guard confines access to
    pub fn log_root(&self) -> &Path {
        &self.log_root
    }

    /// Returns true when `path` may be accessed
    ///
    /// A path is accepted only if it is non-blank, lies under the log root,
    /// contains no parent-directory segment and ends with `.log`.
    ///
    /// The check is lexical. Symlinks are not resolved, so a link inside the
    /// log root that points elsewhere is accepted.
    pub fn validate(&self, path: &str) -> bool {
        if path.trim().is_empty() {
            warn!("Log path is blank");
            return false;
        }

        let candidate = Path::new(path);
        let traverses = path.contains("../")
            || candidate
                .components()
                .any(|component| component == Component::ParentDir);

        candidate.starts_with(&self.log_root) && !traverses && path.ends_with(LOG_FILE_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> PathGuard {
        PathGuard::new("/opt/worker")
    }

    #[test]
    fn test_accepts_log_under_root() {
        assert!(guard().validate("/opt/worker/logs/20240101/1_2.log"));
        assert!(guard().validate("/opt/worker/t1.log"));
    }

    #[test]
    fn test_rejects_blank_path() {
        assert!(!guard().validate(""));
        assert!(!guard().validate("   "));
    }

    #[test]
    fn test_rejects_path_outside_root() {
        assert!(!guard().validate("/etc/passwd"));
        assert!(!guard().validate("/var/log/worker.log"));
        assert!(!guard().validate("logs/t1.log"));
    }

    #[test]
    fn test_rejects_sibling_with_shared_prefix() {
        assert!(!guard().validate("/opt/worker-evil/logs/t1.log"));
    }

    #[test]
    fn test_rejects_traversal() {
        assert!(!guard().validate("/opt/worker/logs/../../t1.log"));
        assert!(!guard().validate("/opt/worker/../t1.log"));
        assert!(!guard().validate("/opt/worker/logs/..evil/../x.log"));
    }

    #[test]
    fn test_rejects_wrong_suffix() {
        assert!(!guard().validate("/opt/worker/conf/application.properties"));
        assert!(!guard().validate("/opt/worker/logs/t1.log.gz"));
        assert!(!guard().validate("/opt/worker/logs"));
    }

    #[test]
    fn test_log_root_accessor() {
        assert_eq!(guard().log_root(), Path::new("/opt/worker"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_resolved() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("secret.log");
        std::fs::write(&target, "secret\n").unwrap();
        let link = dir.path().join("link.log");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let guard = PathGuard::new(dir.path());
        assert!(guard.validate(&link.to_string_lossy()));
        assert!(!guard.validate(&target.to_string_lossy()));
    }
}
