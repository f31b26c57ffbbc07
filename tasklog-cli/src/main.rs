//! Tasklog CLI
//!
//! Command-line interface for reading task logs from a worker's log server.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "tasklog")]
#[command(about = "Remote task log access CLI", long_about = None)]
struct Cli {
    /// Worker log server address
    #[arg(long, env = "TASKLOG_WORKER_ADDR", default_value = "127.0.0.1:1234")]
    worker: String,

    /// Seconds to wait for each response
    #[arg(long, env = "TASKLOG_TIMEOUT", default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        worker_addr: cli.worker,
        timeout: Duration::from_secs(cli.timeout),
    };

    handle_command(cli.command, &config).await
}
