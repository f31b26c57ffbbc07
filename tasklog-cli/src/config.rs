//! Configuration module
//!
//! Handles CLI configuration including the worker address and timeout.

use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address of the worker's log server
    pub worker_addr: String,

    /// How long to wait for each response
    pub timeout: Duration,
}
