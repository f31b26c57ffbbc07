//! Log DTOs for remote task-log access
//!
//! Field names follow the camelCase spelling used on the wire.

use serde::{Deserialize, Serialize};

use crate::domain::command::{Command, CommandType};
use crate::dto::CommandBody;
use crate::error::{ProtocolError, Result};

// =============================================================================
// Requests
// =============================================================================

/// Download a whole log file as raw bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLogBytesRequest {
    pub path: String,
}

/// View a whole log file as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewLogRequest {
    pub path: String,
}

/// View a window of lines from a log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollViewLogRequest {
    pub path: String,
    pub skip_line_num: u32,
    pub limit: u32,
}

/// Delete a task's log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveTaskLogRequest {
    pub path: String,
}

/// Extract external application ids from a log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAppIdRequest {
    pub log_path: String,
}

impl CommandBody for GetLogBytesRequest {
    const COMMAND_TYPE: CommandType = CommandType::GetLogBytesRequest;
}

impl CommandBody for ViewLogRequest {
    const COMMAND_TYPE: CommandType = CommandType::ViewWholeLogRequest;
}

impl CommandBody for RollViewLogRequest {
    const COMMAND_TYPE: CommandType = CommandType::RollViewLogRequest;
}

impl CommandBody for RemoveTaskLogRequest {
    const COMMAND_TYPE: CommandType = CommandType::RemoveTakLogRequest;
}

impl CommandBody for GetAppIdRequest {
    const COMMAND_TYPE: CommandType = CommandType::GetAppIdRequest;
}

/// Any request a worker answers
///
/// Decoding a [`Command`] into this type is the single place where command
/// types are mapped to request shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRequest {
    GetLogBytes(GetLogBytesRequest),
    ViewWholeLog(ViewLogRequest),
    RollViewLog(RollViewLogRequest),
    RemoveTaskLog(RemoveTaskLogRequest),
    GetAppId(GetAppIdRequest),
}

impl TryFrom<&Command> for LogRequest {
    type Error = ProtocolError;

    fn try_from(command: &Command) -> Result<Self> {
        match command.command_type {
            CommandType::GetLogBytesRequest => Ok(LogRequest::GetLogBytes(
                GetLogBytesRequest::from_command(command)?,
            )),
            CommandType::ViewWholeLogRequest => Ok(LogRequest::ViewWholeLog(
                ViewLogRequest::from_command(command)?,
            )),
            CommandType::RollViewLogRequest => Ok(LogRequest::RollViewLog(
                RollViewLogRequest::from_command(command)?,
            )),
            CommandType::RemoveTakLogRequest => Ok(LogRequest::RemoveTaskLog(
                RemoveTaskLogRequest::from_command(command)?,
            )),
            CommandType::GetAppIdRequest => {
                Ok(LogRequest::GetAppId(GetAppIdRequest::from_command(command)?))
            }
            CommandType::GetLogBytesResponse
            | CommandType::ViewWholeLogResponse
            | CommandType::RollViewLogResponse
            | CommandType::RemoveTakLogResponse
            | CommandType::GetAppIdResponse => {
                Err(ProtocolError::UnsupportedCommand(command.command_type))
            }
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Raw bytes of a log file, carried as a base64 string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLogBytesResponse {
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

/// Full text of a log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewLogResponse {
    pub content: String,
}

/// Outcome of a rolling view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RollViewLogStatus {
    Ok,
    LogPathIsNotSecurity,
    LogFileNotFound,
    UnknownError,
}

/// A window of log lines plus position metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollViewLogResponse {
    pub status: RollViewLogStatus,
    pub current_line_number: u64,
    pub current_total_line_number: u64,
    pub log: String,
}

impl RollViewLogResponse {
    /// Successful window
    pub fn ok(current_line_number: u64, current_total_line_number: u64, log: String) -> Self {
        Self {
            status: RollViewLogStatus::Ok,
            current_line_number,
            current_total_line_number,
            log,
        }
    }

    /// Failed window carrying no content
    pub fn error(status: RollViewLogStatus) -> Self {
        Self {
            status,
            current_line_number: 0,
            current_total_line_number: 0,
            log: String::new(),
        }
    }

    /// Whether the window was read successfully
    pub fn is_ok(&self) -> bool {
        self.status == RollViewLogStatus::Ok
    }
}

/// Result of a log deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveTaskLogResponse {
    pub status: bool,
}

/// Application ids found in a log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAppIdResponse {
    pub app_ids: Vec<String>,
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}

impl CommandBody for GetLogBytesResponse {
    const COMMAND_TYPE: CommandType = CommandType::GetLogBytesResponse;
}

impl CommandBody for ViewLogResponse {
    const COMMAND_TYPE: CommandType = CommandType::ViewWholeLogResponse;
}

impl CommandBody for RollViewLogResponse {
    const COMMAND_TYPE: CommandType = CommandType::RollViewLogResponse;
}

impl CommandBody for RemoveTaskLogResponse {
    const COMMAND_TYPE: CommandType = CommandType::RemoveTakLogResponse;
}

impl CommandBody for GetAppIdResponse {
    const COMMAND_TYPE: CommandType = CommandType::GetAppIdResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_view_request_wire_names() {
        let command = Command::new(
            CommandType::RollViewLogRequest,
            7,
            br#"{"path":"/opt/worker/logs/1.log","skipLineNum":10,"limit":50}"#.to_vec(),
        );

        let request = LogRequest::try_from(&command).unwrap();
        assert_eq!(
            request,
            LogRequest::RollViewLog(RollViewLogRequest {
                path: "/opt/worker/logs/1.log".to_string(),
                skip_line_num: 10,
                limit: 50,
            })
        );
    }

    #[test]
    fn test_negative_window_is_a_decode_error() {
        let command = Command::new(
            CommandType::RollViewLogRequest,
            7,
            br#"{"path":"/a.log","skipLineNum":-1,"limit":5}"#.to_vec(),
        );

        let result = LogRequest::try_from(&command);
        assert!(matches!(result, Err(ProtocolError::Body(_))));
    }

    #[test]
    fn test_app_id_request_uses_log_path() {
        let command = Command::new(
            CommandType::GetAppIdRequest,
            1,
            br#"{"logPath":"/opt/worker/logs/1.log"}"#.to_vec(),
        );

        let request = LogRequest::try_from(&command).unwrap();
        assert!(matches!(request, LogRequest::GetAppId(r) if r.log_path == "/opt/worker/logs/1.log"));
    }

    #[test]
    fn test_response_types_are_not_requests() {
        let command = Command::new(CommandType::ViewWholeLogResponse, 3, b"{}".to_vec());

        let result = LogRequest::try_from(&command);
        assert!(matches!(
            result,
            Err(ProtocolError::UnsupportedCommand(CommandType::ViewWholeLogResponse))
        ));
    }

    #[test]
    fn test_convert_to_command_keeps_opaque() {
        let response = RemoveTaskLogResponse { status: true };
        let command = response.convert_to_command(99).unwrap();

        assert_eq!(command.command_type, CommandType::RemoveTakLogResponse);
        assert_eq!(command.opaque, 99);
        assert_eq!(command.body, br#"{"status":true}"#.to_vec());
    }

    #[test]
    fn test_from_command_checks_type() {
        let command = ViewLogResponse {
            content: "hello".to_string(),
        }
        .convert_to_command(1)
        .unwrap();

        let result = GetAppIdResponse::from_command(&command);
        assert!(matches!(
            result,
            Err(ProtocolError::UnexpectedCommandType {
                expected: CommandType::GetAppIdResponse,
                actual: CommandType::ViewWholeLogResponse,
            })
        ));
    }

    #[test]
    fn test_roll_view_response_wire_format() {
        let response = RollViewLogResponse::ok(4, 5, "line3\r\nline4".to_string());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "OK");
        assert_eq!(json["currentLineNumber"], 4);
        assert_eq!(json["currentTotalLineNumber"], 5);
        assert_eq!(json["log"], "line3\r\nline4");

        let error = RollViewLogResponse::error(RollViewLogStatus::LogPathIsNotSecurity);
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["status"], "LOG_PATH_IS_NOT_SECURITY");
        assert!(!error.is_ok());
    }

    #[test]
    fn test_log_bytes_travel_as_base64() {
        let response = GetLogBytesResponse {
            bytes: b"hi\xff".to_vec(),
        };
        let command = response.convert_to_command(2).unwrap();
        assert_eq!(command.body, br#"{"bytes":"aGn/"}"#.to_vec());

        let decoded = GetLogBytesResponse::from_command(&command).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_invalid_base64_is_a_decode_error() {
        let command = Command::new(
            CommandType::GetLogBytesResponse,
            2,
            br#"{"bytes":"not base64!"}"#.to_vec(),
        );

        let result = GetLogBytesResponse::from_command(&command);
        assert!(matches!(result, Err(ProtocolError::Body(_))));
    }

    #[test]
    fn test_oversized_body_is_refused() {
        let response = ViewLogResponse {
            content: "x".repeat(crate::codec::MAX_BODY_SIZE),
        };

        let result = response.convert_to_command(5);
        assert!(matches!(
            result,
            Err(ProtocolError::FrameTooLarge { max, .. }) if max == crate::codec::MAX_BODY_SIZE
        ));
    }
}
