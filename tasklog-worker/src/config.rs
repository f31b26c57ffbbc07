//! Worker log-server configuration
//!
//! Defines the log root that bounds all remote file access, the address the
//! log server listens on and the size of the blocking pool used for file I/O.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default listen address of the log server
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:1234";

/// Log server configuration
///
/// Resolved once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory under which every accessible log file must live
    pub log_root: PathBuf,

    /// Address the log server binds to (e.g., "0.0.0.0:1234")
    pub bind_addr: String,

    /// Maximum number of commands processed concurrently
    pub worker_threads: usize,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(log_root: PathBuf) -> Self {
        Self {
            log_root,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            worker_threads: default_worker_threads(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - WORKER_HOME (optional, default: current working directory)
    /// - LOGGER_BIND_ADDR (optional, default: 0.0.0.0:1234)
    /// - LOGGER_WORKER_THREADS (optional, default: 2 * CPUs + 1)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_root = match lookup("WORKER_HOME").filter(|home| !home.trim().is_empty()) {
            Some(home) => PathBuf::from(home),
            None => std::env::current_dir().context("Failed to resolve current directory")?,
        };

        let bind_addr = lookup("LOGGER_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let worker_threads = lookup("LOGGER_WORKER_THREADS")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or_else(default_worker_threads);

        Ok(Self {
            log_root,
            bind_addr,
            worker_threads,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.log_root.as_os_str().is_empty() {
            anyhow::bail!("log_root cannot be empty");
        }

        if !self.log_root.is_absolute() {
            anyhow::bail!("log_root must be an absolute path");
        }

        self.bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("bind_addr is not a socket address: {}", self.bind_addr))?;

        if self.worker_threads == 0 {
            anyhow::bail!("worker_threads must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Two workers per CPU plus one
fn default_worker_threads() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    cpus * 2 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert!(config.worker_threads >= 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_reads_worker_home() {
        let config = Config::from_lookup(lookup_from(&[
            ("WORKER_HOME", "/opt/worker"),
            ("LOGGER_BIND_ADDR", "127.0.0.1:5678"),
            ("LOGGER_WORKER_THREADS", "4"),
        ]))
        .unwrap();

        assert_eq!(config.log_root, PathBuf::from("/opt/worker"));
        assert_eq!(config.bind_addr, "127.0.0.1:5678");
        assert_eq!(config.worker_threads, 4);
    }

    #[test]
    fn test_blank_worker_home_falls_back_to_current_dir() {
        let config = Config::from_lookup(lookup_from(&[("WORKER_HOME", "  ")])).unwrap();
        assert_eq!(config.log_root, std::env::current_dir().unwrap());

        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.log_root, std::env::current_dir().unwrap());
    }

    #[test]
    fn test_invalid_thread_count_uses_default() {
        let config =
            Config::from_lookup(lookup_from(&[("LOGGER_WORKER_THREADS", "many")])).unwrap();
        assert_eq!(config.worker_threads, default_worker_threads());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::new(PathBuf::from("/opt/worker"));

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Relative log root should fail
        config.log_root = PathBuf::from("worker/logs");
        assert!(config.validate().is_err());

        config.log_root = PathBuf::from("/opt/worker");

        // Invalid bind address should fail
        config.bind_addr = "not-an-address".to_string();
        assert!(config.validate().is_err());

        config.bind_addr = DEFAULT_BIND_ADDR.to_string();

        // Zero threads should fail
        config.worker_threads = 0;
        assert!(config.validate().is_err());
    }
}
