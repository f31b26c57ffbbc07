//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod log;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print a whole log file
    View {
        /// Absolute path of the log file on the worker
        path: String,
    },
    /// Print a window of lines from a log file
    Roll {
        /// Absolute path of the log file on the worker
        path: String,

        /// Number of lines to skip
        #[arg(short, long, default_value_t = 0)]
        skip: u32,

        /// Maximum number of lines to print
        #[arg(short, long, default_value_t = 100)]
        limit: u32,
    },
    /// Download a log file
    Download {
        /// Absolute path of the log file on the worker
        path: String,

        /// Local file to write
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Delete a log file from the worker
    Remove {
        /// Absolute path of the log file on the worker
        path: String,
    },
    /// List application ids found in a log file
    AppIds {
        /// Absolute path of the log file on the worker
        path: String,
    },
}

/// Handle a CLI command
///
/// Connects to the worker and routes the command to its handler.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = log::connect(config).await?;

    match command {
        Commands::View { path } => log::view(&client, &path).await,
        Commands::Roll { path, skip, limit } => log::roll(&client, &path, skip, limit).await,
        Commands::Download { path, output } => log::download(&client, &path, &output).await,
        Commands::Remove { path } => log::remove(&client, &path).await,
        Commands::AppIds { path } => log::app_ids(&client, &path).await,
    }
}
