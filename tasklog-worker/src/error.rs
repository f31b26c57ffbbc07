//! Error types for command processing

use tasklog_core::ProtocolError;
use thiserror::Error;

/// Result type alias for command processing
pub type Result<T> = std::result::Result<T, ProcessError>;

/// A command the worker refuses to answer
///
/// These are fatal to the call: no response is written and the connection
/// layer decides what happens to the connection.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Requested path failed the path guard
    #[error("Illegal path: {0}")]
    IllegalPath(String),

    /// Command could not be decoded or has no request handler
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Connection went away before the response could be queued
    #[error("Connection closed before response to opaque {0} was written")]
    ChannelClosed(i64),
}
