//! Error types for the tasklog client

use std::time::Duration;
use tasklog_core::ProtocolError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the tasklog client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not open a connection to the worker
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        /// Worker address
        addr: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Framing, encoding or decoding failed
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// No matching response arrived in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Worker closed the connection before answering
    ///
    /// Workers close the connection when they reject a request, e.g. for a
    /// path outside their log directory. The next request reconnects.
    #[error("Connection closed by worker")]
    ConnectionClosed,
}

impl ClientError {
    /// Check if the worker dropped the connection instead of answering
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, Self::ConnectionClosed)
    }

    /// Check if this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
