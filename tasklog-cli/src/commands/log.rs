//! Log command handlers
//!
//! Handles viewing, paging, downloading and removing task logs.

use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use tasklog_client::{LogClient, RollViewLogResponse, RollViewLogStatus};

use crate::config::Config;

/// Connect to the configured worker
pub async fn connect(config: &Config) -> Result<LogClient> {
    let client = LogClient::connect(config.worker_addr.clone())
        .await
        .with_context(|| format!("Failed to reach worker at {}", config.worker_addr))?;

    Ok(client.with_timeout(config.timeout))
}

/// Print a whole log file
pub async fn view(client: &LogClient, path: &str) -> Result<()> {
    let content = client.view_log(path).await?;

    if content.is_empty() {
        println!("{}", "Log is empty or could not be read.".yellow());
    } else {
        print!("{}", content);
    }

    Ok(())
}

/// Print a window of lines
pub async fn roll(client: &LogClient, path: &str, skip: u32, limit: u32) -> Result<()> {
    let window = client.roll_view_log(path, skip, limit).await?;

    if window.status != RollViewLogStatus::Ok {
        anyhow::bail!("{}", describe_failure(window.status));
    }

    println!("{}", "─".repeat(80).dimmed());
    if !window.log.is_empty() {
        println!("{}", window.log);
        println!("{}", "─".repeat(80).dimmed());
    }
    println!("{}", window_summary(&window).dimmed());

    Ok(())
}

/// Save a log file locally
pub async fn download(client: &LogClient, path: &str, output: &Path) -> Result<()> {
    let bytes = client.get_log_bytes(path).await?;

    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} Saved {} bytes to {}",
        "✓".green(),
        bytes.len(),
        output.display().to_string().bold()
    );

    Ok(())
}

/// Delete a log file
pub async fn remove(client: &LogClient, path: &str) -> Result<()> {
    if client.remove_task_log(path).await? {
        println!("{} Removed {}", "✓".green(), path.bold());
        Ok(())
    } else {
        anyhow::bail!("Worker failed to remove {}", path)
    }
}

/// List application ids
pub async fn app_ids(client: &LogClient, path: &str) -> Result<()> {
    let app_ids = client.get_app_ids(path).await?;

    if app_ids.is_empty() {
        println!("{}", "No application ids found.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} application id(s):", app_ids.len()).bold()
        );
        for app_id in app_ids {
            println!("  {} {}", "▸".cyan(), app_id);
        }
    }

    Ok(())
}

/// Human-readable reason for a failed rolling view
fn describe_failure(status: RollViewLogStatus) -> &'static str {
    match status {
        RollViewLogStatus::Ok => "ok",
        RollViewLogStatus::LogPathIsNotSecurity => "Path is outside the worker's log directory",
        RollViewLogStatus::LogFileNotFound => "Log file not found",
        RollViewLogStatus::UnknownError => "Worker failed to read the log file",
    }
}

/// Position line printed under a window
fn window_summary(window: &RollViewLogResponse) -> String {
    format!(
        "line {} of {}",
        window.current_line_number, window.current_total_line_number
    )
}
