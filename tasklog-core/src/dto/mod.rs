//! Data Transfer Objects for inter-node communication
//!
//! Every DTO is the JSON body of exactly one command type. The
//! [`CommandBody`] trait ties a body to its type and converts it to and from
//! a [`Command`] envelope.

pub mod log;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec::MAX_BODY_SIZE;
use crate::domain::command::{Command, CommandType};
use crate::error::{ProtocolError, Result};

/// A JSON body bound to a single command type
pub trait CommandBody: Serialize + DeserializeOwned {
    /// Command type this body travels under
    const COMMAND_TYPE: CommandType;

    /// Wraps this body into a command tagged with `opaque`
    ///
    /// Fails with [`ProtocolError::FrameTooLarge`] when the encoded body would
    /// not fit in a frame.
    fn convert_to_command(&self, opaque: i64) -> Result<Command> {
        let body = serde_json::to_vec(self)?;
        if body.len() > MAX_BODY_SIZE {
            return Err(ProtocolError::FrameTooLarge {
                size: body.len(),
                max: MAX_BODY_SIZE,
            });
        }
        Ok(Command::new(Self::COMMAND_TYPE, opaque, body))
    }

    /// Decodes this body from a command of the matching type
    fn from_command(command: &Command) -> Result<Self> {
        if command.command_type != Self::COMMAND_TYPE {
            return Err(ProtocolError::UnexpectedCommandType {
                expected: Self::COMMAND_TYPE,
                actual: command.command_type,
            });
        }

        Ok(serde_json::from_slice(&command.body)?)
    }
}
