// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer connection abstraction.
//
// A connection is a transient byte pipe to one printer. It is created
// unopened, opened right before a write and closed right after. Transports
// (BlueZ RFCOMM, Android SPP sockets, test doubles) implement `Connection`;
// `ConnectionProvider` hands out a fresh one per address.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;
use tracing::debug;

use labelwerk_core::error::Result;

/// Size of the chunks written to the transport.
pub const WRITE_CHUNK_SIZE: usize = 1024;

/// Once a response has started, stop reading after this much silence.
pub const QUIET_PERIOD: Duration = Duration::from_millis(500);

/// A byte-stream connection to a single printer.
#[async_trait]
pub trait Connection: Send {
    /// Address this connection targets.
    fn address(&self) -> &str;

    /// Open the underlying transport.
    async fn open(&mut self) -> Result<()>;

    /// Whether the transport is currently open.
    fn is_connected(&self) -> bool;

    /// Write all of `data` to the printer.
    async fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Read whatever the printer sends within `max_wait`.
    ///
    /// Reading stops early once the printer goes quiet for a short while
    /// after the first bytes arrive. An empty vector means no answer.
    async fn read_with_timeout(&mut self, max_wait: Duration) -> Result<Vec<u8>>;

    /// Close the transport. Closing an unopened connection is a no-op.
    async fn close(&mut self) -> Result<()>;
}

/// Factory for per-write connections.
pub trait ConnectionProvider: Send + Sync {
    /// Create a new, unopened connection to `address`.
    fn connection(&self, address: &str) -> Box<dyn Connection>;
}

/// Write `data` in [`WRITE_CHUNK_SIZE`] chunks and flush.
pub async fn write_chunked<W>(writer: &mut W, data: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut sent = 0;
    for chunk in data.chunks(WRITE_CHUNK_SIZE) {
        writer.write_all(chunk).await?;
        sent += chunk.len();
        debug!(sent, total = data.len(), "write progress");
    }
    writer.flush().await
}

/// Read a response that arrives within `max_wait`.
///
/// Waits up to `max_wait` for the first bytes, then keeps reading until the
/// peer is silent for [`QUIET_PERIOD`], closes the stream, or the overall
/// deadline passes.
pub async fn read_until_quiet<R>(reader: &mut R, max_wait: Duration) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let deadline = Instant::now() + max_wait;
    let mut response = Vec::new();
    let mut buf = [0u8; 512];

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let wait = if response.is_empty() {
            remaining
        } else {
            remaining.min(QUIET_PERIOD)
        };
        if wait.is_zero() {
            break;
        }

        match tokio::time::timeout(wait, reader.read(&mut buf)).await {
            Err(_elapsed) => break,
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => response.extend_from_slice(&buf[..n]),
            Ok(Err(e)) => return Err(e),
        }
    }

    Ok(response)
}
