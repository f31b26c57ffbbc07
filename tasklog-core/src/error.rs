//! Error types for the tasklog wire protocol

use thiserror::Error;

use crate::domain::command::CommandType;

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while framing, decoding or interpreting commands
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Underlying stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame did not start with the protocol magic byte
    #[error("invalid magic byte: {0:#04x}")]
    InvalidMagic(u8),

    /// Frame was produced by an incompatible protocol version
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// Frame carried a command type code this build does not know
    #[error("unknown command type code: {0}")]
    UnknownCommandType(u8),

    /// Body length prefix exceeds the frame limit
    #[error("frame too large: {size} bytes exceeds maximum {max} bytes")]
    FrameTooLarge {
        /// Declared body size
        size: usize,
        /// Maximum allowed body size
        max: usize,
    },

    /// Command body was not valid JSON for the expected shape
    #[error("failed to decode command body: {0}")]
    Body(#[from] serde_json::Error),

    /// Command was not of the type the caller expected
    #[error("unexpected command type: expected {expected}, got {actual}")]
    UnexpectedCommandType {
        /// Type the caller expected
        expected: CommandType,
        /// Type actually received
        actual: CommandType,
    },

    /// Command type is valid on the wire but has no request handler
    #[error("unsupported command type: {0}")]
    UnsupportedCommand(CommandType),
}
