//! Log server
//!
//! Accepts connections from other nodes and answers log commands on them.
//! Each command is processed on the blocking pool so a slow file read never
//! stalls the connection's read loop. The number of commands in flight is
//! bounded by a semaphore sized from the configuration, and each connection
//! queues at most [`RESPONSE_QUEUE_CAPACITY`] responses.

use anyhow::{Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tasklog_core::codec;
use tasklog_core::domain::command::Command;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info, warn};

use crate::channel::ReservedResponse;
use crate::config::Config;
use crate::error::ProcessError;
use crate::processor::LogRequestProcessor;

/// Responses a connection may have queued or in progress before reading stops
pub const RESPONSE_QUEUE_CAPACITY: usize = 16;

/// TCP server for log commands
pub struct LogServer {
    config: Config,
    processor: Arc<LogRequestProcessor>,
    semaphore: Arc<Semaphore>,
}

impl LogServer {
    /// Creates a new log server
    pub fn new(config: Config, processor: Arc<LogRequestProcessor>) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.worker_threads));
        Self {
            config,
            processor,
            semaphore,
        }
    }

    /// Binds the configured address and serves until `shutdown` completes
    pub async fn run(&self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let listener = TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind to {}", self.config.bind_addr))?;

        info!("Log server listening on {}", self.config.bind_addr);
        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener
    pub async fn serve(&self, listener: TcpListener, shutdown: impl Future<Output = ()>) -> Result<()> {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Log server shutting down");
                    return Ok(());
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!("Accepted connection from {}", peer);
                        let processor = Arc::clone(&self.processor);
                        let semaphore = Arc::clone(&self.semaphore);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, peer, processor, semaphore).await {
                                error!("Connection {} failed: {:#}", peer, e);
                            }
                        });
                    }
                    Err(e) => warn!("Failed to accept connection: {}", e),
                },
            }
        }
    }
}

/// Reads commands from one connection until it closes or a command is rejected
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    processor: Arc<LogRequestProcessor>,
    semaphore: Arc<Semaphore>,
) -> Result<()> {
    let (mut reader, mut writer) = stream.into_split();
    let (response_tx, mut response_rx) = mpsc::channel::<Command>(RESPONSE_QUEUE_CAPACITY);
    let (reject_tx, mut reject_rx) = mpsc::channel::<ProcessError>(1);

    let writer_task = tokio::spawn(async move {
        while let Some(response) = response_rx.recv().await {
            if let Err(e) = codec::write_command(&mut writer, &response).await {
                warn!("Failed to write response to {}: {}", peer, e);
                break;
            }
        }
    });

    loop {
        // A frame cut short by the rejection branch is dropped with the connection
        let command = tokio::select! {
            frame = codec::read_command(&mut reader) => match frame {
                Ok(Some(command)) => command,
                Ok(None) => {
                    debug!("Connection {} closed by peer", peer);
                    break;
                }
                Err(e) => {
                    warn!("Dropping connection {} after unreadable frame: {}", peer, e);
                    break;
                }
            },
            Some(e) = reject_rx.recv() => {
                warn!("Closing connection {} after rejected command: {}", peer, e);
                break;
            }
        };

        // Waits while the peer is not reading its responses
        let Ok(slot) = response_tx.clone().reserve_owned().await else {
            debug!("Writer for {} stopped, closing connection", peer);
            break;
        };
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .context("Command pool closed")?;
        let processor = Arc::clone(&processor);
        let channel = ReservedResponse::new(slot);
        let reject_tx = reject_tx.clone();

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            if let Err(e) = processor.process(&channel, &command) {
                // One pending rejection is enough to close the connection
                let _ = reject_tx.try_send(e);
            }
        });
    }

    // The writer drains once in-flight commands release their senders
    drop(response_tx);
    if let Err(e) = writer_task.await {
        warn!("Writer task for {} panicked: {}", peer, e);
    }

    Ok(())
}
