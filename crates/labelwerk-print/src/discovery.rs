// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer discovery passes.
//
// A `Discoverer` walks the radio and reports each device it finds to a
// `DiscoveryHandler`. `DiscoveryPass` is the handler used by the bridge: it
// accumulates records in the order they were found and, when the discoverer
// returns, delivers exactly one terminal result: the JSON array of records
// or an error message.
//
//     idle -> discovering -> finished(n) | error

use async_trait::async_trait;
use tracing::{debug, error, info};
use uuid::Uuid;

use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::types::DiscoveredPrinter;

/// Class of Device: major device class "Imaging".
const COD_MAJOR_IMAGING: u32 = 0x06;

/// Class of Device: minor bit "Printer" within the Imaging major class.
const COD_MINOR_PRINTER: u32 = 0x80;

/// Whether a Bluetooth Class of Device value describes a printer.
pub fn is_printer_class(class: u32) -> bool {
    let major = (class >> 8) & 0x1F;
    major == COD_MAJOR_IMAGING && class & COD_MINOR_PRINTER != 0
}

/// Receives devices as a discoverer finds them.
pub trait DiscoveryHandler: Send {
    fn found_printer(&mut self, printer: DiscoveredPrinter);
}

/// A source of nearby printers.
#[async_trait]
pub trait Discoverer: Send + Sync {
    /// Run one discovery pass, reporting devices to `handler`.
    ///
    /// Returns once the pass is over. An `Err` means the pass could not
    /// start or broke off; devices reported before that are discarded by
    /// the caller.
    async fn find_printers(&self, handler: &mut dyn DiscoveryHandler) -> Result<()>;
}

/// Lifecycle of a discovery pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryState {
    Idle,
    Discovering,
    Finished { found: usize },
    Error(String),
}

impl DiscoveryState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. } | Self::Error(_))
    }
}

/// Accumulator for one pass.
#[derive(Debug)]
pub struct DiscoveryPass {
    id: Uuid,
    state: DiscoveryState,
    printers: Vec<DiscoveredPrinter>,
}

impl Default for DiscoveryPass {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoveryPass {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: DiscoveryState::Idle,
            printers: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &DiscoveryState {
        &self.state
    }

    /// Records accumulated so far, in discovery order.
    pub fn printers(&self) -> &[DiscoveredPrinter] {
        &self.printers
    }

    /// Drive `discoverer` through one pass and return the terminal result.
    ///
    /// `Ok` carries the serialized JSON array (`[]` when nothing was found);
    /// `Err` carries the failure. Consuming `self` makes a second terminal
    /// transition impossible.
    pub async fn run(mut self, discoverer: &dyn Discoverer) -> Result<String> {
        self.state = DiscoveryState::Discovering;
        info!(pass = %self.id, "printer discovery started");

        let outcome = discoverer.find_printers(&mut self).await;
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: Result<()>) -> Result<String> {
        match outcome.and_then(|()| serialize_printers(&self.printers)) {
            Ok(json) => {
                self.state = DiscoveryState::Finished {
                    found: self.printers.len(),
                };
                info!(pass = %self.id, found = self.printers.len(), printers = %json, "found printers");
                Ok(json)
            }
            Err(e) => {
                self.state = DiscoveryState::Error(e.to_string());
                error!(pass = %self.id, error = %e, "discovery error");
                Err(e)
            }
        }
    }
}

impl DiscoveryHandler for DiscoveryPass {
    fn found_printer(&mut self, printer: DiscoveredPrinter) {
        if self.state.is_terminal() {
            debug!(pass = %self.id, address = %printer.address, "ignoring device reported after pass ended");
            return;
        }
        debug!(pass = %self.id, address = %printer.address, name = %printer.friendly_name, "printer found");
        self.printers.push(printer);
    }
}

/// Serialize records into the JSON array delivered to the UI.
pub fn serialize_printers(printers: &[DiscoveredPrinter]) -> Result<String> {
    Ok(serde_json::to_string(printers)?)
}

/// Parse a JSON array produced by [`serialize_printers`].
///
/// Records whose `friendlyName` is missing, `null` or blank get `"Unknown"`.
pub fn parse_printers(json: &str) -> Result<Vec<DiscoveredPrinter>> {
    serde_json::from_str(json).map_err(LabelwerkError::from)
}
