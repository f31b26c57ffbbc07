//! Binary framing of commands
//!
//! Frame layout (all integers big-endian):
//!
//! ```text
//! +-------+---------+------+--------+----------+------+
//! | magic | version | type | opaque | body_len | body |
//! |  u8   |   u8    |  u8  |  i64   |   u32    |  ..  |
//! +-------+---------+------+--------+----------+------+
//! ```
//!
//! The body length is checked against [`MAX_BODY_SIZE`] before allocation.

use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::domain::command::{Command, CommandType};
use crate::error::{ProtocolError, Result};

/// First byte of every frame
pub const MAGIC: u8 = 0xbe;

/// Protocol version written by this build
pub const VERSION: u8 = 0;

/// Size of the fixed frame header in bytes
pub const HEADER_LEN: usize = 15;

/// Maximum body size in bytes (64 MiB)
pub const MAX_BODY_SIZE: usize = 64 * 1024 * 1024;

/// Encodes a command into a complete frame
pub fn encode(command: &Command) -> Result<Vec<u8>> {
    let body_len = command.body.len();
    if body_len > MAX_BODY_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: body_len,
            max: MAX_BODY_SIZE,
        });
    }

    let mut frame = Vec::with_capacity(HEADER_LEN + body_len);
    frame.push(MAGIC);
    frame.push(VERSION);
    frame.push(command.command_type.code());
    frame.extend_from_slice(&command.opaque.to_be_bytes());
    frame.extend_from_slice(&(body_len as u32).to_be_bytes());
    frame.extend_from_slice(&command.body);

    Ok(frame)
}

/// Writes one command frame and flushes the writer
pub async fn write_command<W>(writer: &mut W, command: &Command) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let frame = encode(command)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one command frame
///
/// Returns `Ok(None)` when the stream ends cleanly before a new frame starts.
/// EOF in the middle of a frame is an error.
pub async fn read_command<R>(reader: &mut R) -> Result<Option<Command>>
where
    R: AsyncRead + Unpin,
{
    let magic = match reader.read_u8().await {
        Ok(byte) => byte,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if magic != MAGIC {
        return Err(ProtocolError::InvalidMagic(magic));
    }

    let version = reader.read_u8().await?;
    if version != VERSION {
        return Err(ProtocolError::UnsupportedVersion(version));
    }

    let command_type = CommandType::try_from(reader.read_u8().await?)?;
    let opaque = reader.read_i64().await?;

    let body_len = reader.read_u32().await? as usize;
    if body_len > MAX_BODY_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: body_len,
            max: MAX_BODY_SIZE,
        });
    }

    let mut body = vec![0u8; body_len];
    reader.read_exact(&mut body).await?;

    Ok(Some(Command::new(command_type, opaque, body)))
}
