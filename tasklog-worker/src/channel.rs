//! Response channel
//!
//! The processor writes responses through this trait instead of touching the
//! socket, so it can run on any thread and be tested without a network.

use std::sync::Mutex;
use tasklog_core::domain::command::Command;
use tokio::sync::mpsc::OwnedPermit;

use crate::error::{ProcessError, Result};

/// Sink for responses on the connection a command arrived on
pub trait ResponseChannel: Send + Sync {
    /// Queues `command` for writing to the peer
    fn write_and_flush(&self, command: Command) -> Result<()>;
}

/// A slot reserved on a connection's bounded response queue
///
/// The server reserves the slot before it processes a command, so a peer that
/// stops reading stalls its own read loop instead of growing the queue.
/// Exactly one response fits; releasing the slot unused frees it for the next
/// command.
pub struct ReservedResponse {
    permit: Mutex<Option<OwnedPermit<Command>>>,
}

impl ReservedResponse {
    pub fn new(permit: OwnedPermit<Command>) -> Self {
        Self {
            permit: Mutex::new(Some(permit)),
        }
    }
}

impl ResponseChannel for ReservedResponse {
    fn write_and_flush(&self, command: Command) -> Result<()> {
        let opaque = command.opaque;
        let permit = self
            .permit
            .lock()
            .map_err(|_| ProcessError::ChannelClosed(opaque))?
            .take()
            .ok_or(ProcessError::ChannelClosed(opaque))?;

        permit.send(command);
        Ok(())
    }
}
