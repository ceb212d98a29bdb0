// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bluetooth Classic transport via BlueZ (`bluer`).
//
// Label printers expose the Serial Port Profile; a print job is an RFCOMM
// stream that we open, write and close. Discovery runs a BR/EDR inquiry on
// the default adapter for a fixed window and reports each new device once,
// in the order the adapter announced it.

#![cfg(target_os = "linux")]

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use bluer::rfcomm::{SocketAddr, Stream};
use bluer::{Adapter, AdapterEvent, Address, DiscoveryFilter, DiscoveryTransport};
use futures::{StreamExt, pin_mut};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::types::DiscoveredPrinter;

use crate::connection::{Connection, ConnectionProvider, read_until_quiet, write_chunked};
use crate::discovery::{Discoverer, DiscoveryHandler, is_printer_class};

/// Timeout for establishing the RFCOMM link.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// An RFCOMM connection to one printer.
pub struct BluetoothConnection {
    address: String,
    channel: u8,
    stream: Option<Stream>,
}

impl BluetoothConnection {
    pub fn new(address: &str, channel: u8) -> Self {
        Self {
            address: address.to_owned(),
            channel,
            stream: None,
        }
    }

    fn stream_mut(&mut self) -> Result<&mut Stream> {
        let address = &self.address;
        self.stream
            .as_mut()
            .ok_or_else(|| LabelwerkError::connection(address, "connection is not open"))
    }
}

#[async_trait]
impl Connection for BluetoothConnection {
    fn address(&self) -> &str {
        &self.address
    }

    async fn open(&mut self) -> Result<()> {
        let addr: Address = self
            .address
            .parse()
            .map_err(|e| LabelwerkError::connection(&self.address, format!("invalid Bluetooth address: {e}")))?;

        info!(address = %self.address, channel = self.channel, "opening RFCOMM connection");
        let stream = tokio::time::timeout(CONNECT_TIMEOUT, Stream::connect(SocketAddr::new(addr, self.channel)))
            .await
            .map_err(|_| {
                LabelwerkError::connection(
                    &self.address,
                    format!("connect timed out after {}s", CONNECT_TIMEOUT.as_secs()),
                )
            })?
            .map_err(|e| LabelwerkError::connection(&self.address, e))?;

        self.stream = Some(stream);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream_mut()?;
        if let Err(e) = write_chunked(stream, data).await {
            self.stream = None;
            return Err(LabelwerkError::connection(&self.address, format!("write failed: {e}")));
        }
        Ok(())
    }

    async fn read_with_timeout(&mut self, max_wait: Duration) -> Result<Vec<u8>> {
        let stream = self.stream_mut()?;
        match read_until_quiet(stream, max_wait).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => Err(LabelwerkError::connection(&self.address, format!("read failed: {e}"))),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!(address = %self.address, "closing RFCOMM connection");
            stream
                .shutdown()
                .await
                .map_err(|e| LabelwerkError::connection(&self.address, format!("close failed: {e}")))?;
        }
        Ok(())
    }
}

/// Hands out RFCOMM connections on a fixed channel.
pub struct BluetoothConnector {
    channel: u8,
}

impl BluetoothConnector {
    pub fn new(channel: u8) -> Self {
        Self { channel }
    }
}

impl ConnectionProvider for BluetoothConnector {
    fn connection(&self, address: &str) -> Box<dyn Connection> {
        Box::new(BluetoothConnection::new(address, self.channel))
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// BR/EDR discovery on the default BlueZ adapter.
pub struct BluetoothDiscoverer {
    window: Duration,
    printers_only: bool,
}

impl BluetoothDiscoverer {
    pub fn new(window: Duration, printers_only: bool) -> Self {
        Self {
            window,
            printers_only,
        }
    }

    async fn default_adapter() -> Result<Adapter> {
        let session = bluer::Session::new()
            .await
            .map_err(|e| LabelwerkError::Discovery(format!("cannot reach bluetoothd: {e}")))?;
        let adapter = session
            .default_adapter()
            .await
            .map_err(|e| LabelwerkError::Discovery(format!("no Bluetooth adapter: {e}")))?;

        let powered = adapter
            .is_powered()
            .await
            .map_err(|e| LabelwerkError::Discovery(format!("adapter {}: {e}", adapter.name())))?;
        if !powered {
            return Err(LabelwerkError::Discovery(format!(
                "adapter {} is not powered",
                adapter.name()
            )));
        }
        Ok(adapter)
    }

    /// Read name and class for `addr`; `None` when the device should be skipped.
    async fn describe(&self, adapter: &Adapter, addr: Address) -> Option<DiscoveredPrinter> {
        let device = match adapter.device(addr) {
            Ok(d) => d,
            Err(e) => {
                warn!(address = %addr, error = %e, "device vanished before it could be read");
                return None;
            }
        };

        if self.printers_only {
            let class = device.class().await.ok().flatten();
            if !class.is_some_and(is_printer_class) {
                debug!(address = %addr, ?class, "skipping non-printer device");
                return None;
            }
        }

        let name = device.name().await.ok().flatten();
        Some(DiscoveredPrinter::new(addr.to_string(), name))
    }
}

#[async_trait]
impl Discoverer for BluetoothDiscoverer {
    async fn find_printers(&self, handler: &mut dyn DiscoveryHandler) -> Result<()> {
        let adapter = Self::default_adapter().await?;

        let mut filter = DiscoveryFilter::default();
        filter.transport = DiscoveryTransport::BrEdr;
        adapter
            .set_discovery_filter(filter)
            .await
            .map_err(|e| LabelwerkError::Discovery(format!("set discovery filter: {e}")))?;

        let events = adapter
            .discover_devices()
            .await
            .map_err(|e| LabelwerkError::Discovery(format!("start discovery: {e}")))?;
        pin_mut!(events);

        info!(adapter = %adapter.name(), window_secs = self.window.as_secs(), "Bluetooth inquiry started");

        let window = tokio::time::sleep(self.window);
        tokio::pin!(window);

        let mut seen = HashSet::new();
        loop {
            tokio::select! {
                _ = &mut window => break,
                event = events.next() => match event {
                    Some(AdapterEvent::DeviceAdded(addr)) => {
                        if !seen.insert(addr) {
                            continue;
                        }
                        if let Some(printer) = self.describe(&adapter, addr).await {
                            handler.found_printer(printer);
                        }
                    }
                    Some(_) => {}
                    None => {
                        return Err(LabelwerkError::Discovery(
                            "adapter stopped reporting devices".into(),
                        ));
                    }
                },
            }
        }

        info!(seen = seen.len(), "Bluetooth inquiry finished");
        Ok(())
    }
}
