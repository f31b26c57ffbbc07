//! Log request processor
//!
//! Entry point for every log command a worker receives. The processor decodes
//! the command, checks the requested path, calls one service and writes the
//! response back tagged with the request's opaque.
//!
//! Rolling views report path and file problems in their response status. The
//! other commands reject an insecure path with [`ProcessError::IllegalPath`]
//! and write nothing.

use std::path::Path;
use tasklog_core::domain::command::Command;
use tasklog_core::dto::CommandBody;
use tasklog_core::ProtocolError;
use tasklog_core::dto::log::{
    GetAppIdResponse, GetLogBytesResponse, LogRequest, RemoveTaskLogResponse,
    RollViewLogResponse, RollViewLogStatus, ViewLogResponse,
};
use tracing::{debug, error, info, warn};

use crate::channel::ResponseChannel;
use crate::error::{ProcessError, Result};
use crate::service::{
    PathGuard, RollingLineReader, extract_app_ids, read_all_bytes, read_whole_file,
    remove_log_file,
};

/// Processor for log commands
///
/// Holds no per-command state and is shared across connections.
pub struct LogRequestProcessor {
    path_guard: PathGuard,
    roll_reader: RollingLineReader,
}

impl LogRequestProcessor {
    /// Creates a processor confined to the guard's log root
    pub fn new(path_guard: PathGuard) -> Self {
        let roll_reader = RollingLineReader::new(path_guard.clone());
        Self {
            path_guard,
            roll_reader,
        }
    }

    /// Processes one command and writes its response to `channel`
    ///
    /// # Arguments
    /// * `channel` - Connection the command arrived on
    /// * `command` - The inbound command
    ///
    /// # Returns
    /// An error when the command is rejected; nothing was written in that case
    pub fn process(&self, channel: &dyn ResponseChannel, command: &Command) -> Result<()> {
        info!("Received command: {}", command);

        let opaque = command.opaque;
        let response = match LogRequest::try_from(command)? {
            LogRequest::GetLogBytes(request) => {
                let path = self.secure_path(&request.path)?;
                let bytes = read_all_bytes(path);
                debug!("Read {} bytes from {}", bytes.len(), request.path);
                encode_or(GetLogBytesResponse { bytes }, opaque, || GetLogBytesResponse {
                    bytes: Vec::new(),
                })?
            }
            LogRequest::ViewWholeLog(request) => {
                let path = self.secure_path(&request.path)?;
                let content = read_whole_file(path);
                encode_or(ViewLogResponse { content }, opaque, || ViewLogResponse {
                    content: String::new(),
                })?
            }
            LogRequest::RollViewLog(request) => {
                encode_or(self.roll_reader.read_window(&request), opaque, || {
                    RollViewLogResponse::error(RollViewLogStatus::UnknownError)
                })?
            }
            LogRequest::RemoveTaskLog(request) => {
                let path = self.secure_path(&request.path)?;
                let status = remove_log_file(path);
                RemoveTaskLogResponse { status }.convert_to_command(opaque)?
            }
            LogRequest::GetAppId(request) => {
                let path = self.secure_path(&request.log_path)?;
                let app_ids = extract_app_ids(path);
                encode_or(GetAppIdResponse { app_ids }, opaque, || GetAppIdResponse {
                    app_ids: Vec::new(),
                })?
            }
        };

        channel.write_and_flush(response)
    }

    fn secure_path<'a>(&self, path: &'a str) -> Result<&'a Path> {
        if self.path_guard.validate(path) {
            Ok(Path::new(path))
        } else {
            warn!("Rejected insecure log path: {}", path);
            Err(ProcessError::IllegalPath(path.to_string()))
        }
    }
}

/// Encodes `body`, or the degraded body from `fallback` when it won't fit in a frame
fn encode_or<B: CommandBody>(body: B, opaque: i64, fallback: impl FnOnce() -> B) -> Result<Command> {
    match body.convert_to_command(opaque) {
        Err(ProtocolError::FrameTooLarge { size, max }) => {
            error!(
                "Response for opaque {} is {} bytes, over the {} byte frame limit",
                opaque, size, max
            );
            Ok(fallback().convert_to_command(opaque)?)
        }
        encoded => Ok(encoded?),
    }
}
