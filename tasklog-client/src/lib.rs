//! Tasklog Client
//!
//! A small, type-safe client for reading task logs from a worker's log server.
//!
//! Coordinators and API servers use this crate instead of framing commands
//! themselves. Every request gets a fresh opaque and the client waits for the
//! response carrying that same opaque.
//!
//! # Example
//!
//! ```no_run
//! use tasklog_client::LogClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = LogClient::connect("127.0.0.1:1234").await?;
//!
//!     let window = client
//!         .roll_view_log("/opt/worker/logs/20240101/1_2.log", 0, 100)
//!         .await?;
//!
//!     println!("{}", window.log);
//!     Ok(())
//! }
//! ```

pub mod error;
mod logs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use tasklog_core::dto::log::{RollViewLogResponse, RollViewLogStatus};

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tasklog_core::codec;
use tasklog_core::domain::command::Command;
use tasklog_core::dto::CommandBody;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Default time to wait for a response
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a single worker's log server
///
/// Requests on one client are serialized over a single connection. Create
/// one client per worker.
#[derive(Debug)]
pub struct LogClient {
    /// Worker address (e.g., "127.0.0.1:1234")
    addr: String,
    /// Connection to the worker, dropped after a timeout or broken exchange
    stream: Mutex<Option<TcpStream>>,
    /// Next opaque to hand out
    next_opaque: AtomicI64,
    /// Time to wait for each response
    timeout: Duration,
}

impl LogClient {
    /// Connect to a worker's log server
    ///
    /// # Arguments
    /// * `addr` - The worker's log server address (e.g., "127.0.0.1:1234")
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        let stream = open_stream(&addr).await?;

        Ok(Self {
            addr,
            stream: Mutex::new(Some(stream)),
            next_opaque: AtomicI64::new(1),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set how long to wait for each response
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the worker address
    pub fn addr(&self) -> &str {
        &self.addr
    }

    // =============================================================================
    // Request Handling
    // =============================================================================

    /// Send a request and wait for the response with the same opaque
    ///
    /// A timeout can leave half a frame in the socket, so the connection is
    /// dropped after a timeout or any failed exchange and the next request
    /// opens a fresh one.
    async fn send_sync<Req, Resp>(&self, request: &Req) -> Result<Resp>
    where
        Req: CommandBody,
        Resp: CommandBody,
    {
        let opaque = self.next_opaque.fetch_add(1, Ordering::Relaxed);
        let command = request.convert_to_command(opaque)?;

        let mut slot = self.stream.lock().await;
        let outcome =
            tokio::time::timeout(self.timeout, exchange(&mut slot, &self.addr, &command)).await;

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                *slot = None;
                return Err(e);
            }
            Err(_) => {
                debug!("Dropping connection to {} after timeout", self.addr);
                *slot = None;
                return Err(ClientError::Timeout(self.timeout));
            }
        };

        Ok(Resp::from_command(&response)?)
    }
}

/// Opens a connection to a worker's log server
async fn open_stream(addr: &str) -> Result<TcpStream> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| ClientError::Connect {
            addr: addr.to_string(),
            source,
        })?;

    debug!("Connected to log server at {}", addr);
    Ok(stream)
}

/// Writes `command` and reads until the response with its opaque arrives
///
/// Reconnects first when the previous connection was dropped.
async fn exchange(slot: &mut Option<TcpStream>, addr: &str, command: &Command) -> Result<Command> {
    if slot.is_none() {
        *slot = Some(open_stream(addr).await?);
    }
    let Some(stream) = slot.as_mut() else {
        return Err(ClientError::ConnectionClosed);
    };

    codec::write_command(stream, command).await?;

    loop {
        let Some(response) = codec::read_command(stream).await? else {
            return Err(ClientError::ConnectionClosed);
        };
        if response.opaque == command.opaque {
            return Ok(response);
        }
        warn!(
            "Discarding response with opaque {} while waiting for {}",
            response.opaque, command.opaque
        );
    }
}
