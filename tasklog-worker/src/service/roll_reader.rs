//! Rolling log reader
//!
//! Serves a window of lines from a log file together with the file's total
//! line count. Failures are reported in the response status, never as errors.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tasklog_core::dto::log::{RollViewLogRequest, RollViewLogResponse, RollViewLogStatus};
use tracing::error;

use super::lines::{LogLines, count_lines};
use super::path_guard::PathGuard;

/// Delimiter used when joining the windowed lines
const LINE_DELIMITER: &str = "\r\n";

/// Reads windows of lines from files under the log root
#[derive(Debug, Clone)]
pub struct RollingLineReader {
    path_guard: PathGuard,
}

impl RollingLineReader {
    /// Creates a reader that only serves paths accepted by `path_guard`
    pub fn new(path_guard: PathGuard) -> Self {
        Self { path_guard }
    }

    /// Reads `limit` lines after skipping `skip_line_num` lines
    pub fn read_window(&self, request: &RollViewLogRequest) -> RollViewLogResponse {
        if !self.path_guard.validate(&request.path) {
            error!("Log file path: {} is not a security path", request.path);
            return RollViewLogResponse::error(RollViewLogStatus::LogPathIsNotSecurity);
        }

        let path = Path::new(&request.path);
        if !path.is_file() {
            error!("Log file path: {} doesn't exist", request.path);
            return RollViewLogResponse::error(RollViewLogStatus::LogFileNotFound);
        }

        let skip = request.skip_line_num as usize;
        let limit = request.limit as usize;

        // The window pass consumes its reader, so the count opens the file again
        let result = read_lines(path, skip, limit)
            .and_then(|lines| Ok((lines, count_lines(BufReader::new(File::open(path)?))?)));

        match result {
            Ok((lines, total)) => RollViewLogResponse::ok(
                (skip + lines.len()) as u64,
                total,
                lines.join(LINE_DELIMITER),
            ),
            Err(e) => {
                error!(
                    "Rolling view log error, meet an unknown exception, request: {:?}: {}",
                    request, e
                );
                RollViewLogResponse::error(RollViewLogStatus::UnknownError)
            }
        }
    }
}

fn read_lines(path: &Path, skip: usize, limit: usize) -> io::Result<Vec<String>> {
    let mut lines = LogLines::new(BufReader::new(File::open(path)?));
    lines.by_ref().take(skip).try_for_each(|line| line.map(drop))?;
    lines.take(limit).collect()
}
