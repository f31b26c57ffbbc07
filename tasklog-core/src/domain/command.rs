//! Command envelope and command types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ProtocolError;

/// Wire-visible command type
///
/// The numeric code is what travels in the frame header; the display name is
/// the protocol's canonical spelling (including the historical
/// `REMOVE_TAK_LOG_*` typo, which peers depend on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    GetLogBytesRequest,
    GetLogBytesResponse,
    ViewWholeLogRequest,
    ViewWholeLogResponse,
    RollViewLogRequest,
    RollViewLogResponse,
    RemoveTakLogRequest,
    RemoveTakLogResponse,
    GetAppIdRequest,
    GetAppIdResponse,
}

impl CommandType {
    /// Every command type, in wire-code order
    pub const ALL: [CommandType; 10] = [
        CommandType::GetLogBytesRequest,
        CommandType::GetLogBytesResponse,
        CommandType::ViewWholeLogRequest,
        CommandType::ViewWholeLogResponse,
        CommandType::RollViewLogRequest,
        CommandType::RollViewLogResponse,
        CommandType::RemoveTakLogRequest,
        CommandType::RemoveTakLogResponse,
        CommandType::GetAppIdRequest,
        CommandType::GetAppIdResponse,
    ];

    /// Numeric code carried in the frame header
    pub fn code(self) -> u8 {
        match self {
            CommandType::GetLogBytesRequest => 1,
            CommandType::GetLogBytesResponse => 2,
            CommandType::ViewWholeLogRequest => 3,
            CommandType::ViewWholeLogResponse => 4,
            CommandType::RollViewLogRequest => 5,
            CommandType::RollViewLogResponse => 6,
            CommandType::RemoveTakLogRequest => 7,
            CommandType::RemoveTakLogResponse => 8,
            CommandType::GetAppIdRequest => 9,
            CommandType::GetAppIdResponse => 10,
        }
    }

    /// Canonical protocol name
    pub fn as_str(self) -> &'static str {
        match self {
            CommandType::GetLogBytesRequest => "GET_LOG_BYTES_REQUEST",
            CommandType::GetLogBytesResponse => "GET_LOG_BYTES_RESPONSE",
            CommandType::ViewWholeLogRequest => "VIEW_WHOLE_LOG_REQUEST",
            CommandType::ViewWholeLogResponse => "VIEW_WHOLE_LOG_RESPONSE",
            CommandType::RollViewLogRequest => "ROLL_VIEW_LOG_REQUEST",
            CommandType::RollViewLogResponse => "ROLL_VIEW_LOG_RESPONSE",
            CommandType::RemoveTakLogRequest => "REMOVE_TAK_LOG_REQUEST",
            CommandType::RemoveTakLogResponse => "REMOVE_TAK_LOG_RESPONSE",
            CommandType::GetAppIdRequest => "GET_APP_ID_REQUEST",
            CommandType::GetAppIdResponse => "GET_APP_ID_RESPONSE",
        }
    }
}

impl TryFrom<u8> for CommandType {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        CommandType::ALL
            .into_iter()
            .find(|command_type| command_type.code() == code)
            .ok_or(ProtocolError::UnknownCommandType(code))
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, correlation-tagged message exchanged over a connection
///
/// `opaque` pairs a response with its request: a responder must echo the
/// request's value unchanged. The body is an encoded DTO (see [`crate::dto`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub command_type: CommandType,
    pub opaque: i64,
    pub body: Vec<u8>,
}

impl Command {
    /// Creates a new command
    pub fn new(command_type: CommandType, opaque: i64, body: Vec<u8>) -> Self {
        Self {
            command_type,
            opaque,
            body,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Command [type={}, opaque={}, bodyLen={}]",
            self.command_type,
            self.opaque,
            self.body.len()
        )
    }
}
