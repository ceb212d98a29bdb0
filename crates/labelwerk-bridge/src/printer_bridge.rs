// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The printer bridge: the two operations the UI calls.
//
//   write(address, payload)  fire-and-forget; failures are logged only
//   discover(on_result)      one terminal callback per pass: Ok(json) | Err(human error)
//
// `try_write` and `discover_json` expose the same work with typed results for
// callers that need to know what happened.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use labelwerk_core::AppConfig;
use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::human_errors::{HumanError, humanize_error};
use labelwerk_core::types::WriteOutcome;
use labelwerk_print::{ConnectionProvider, Discoverer, DiscoveryPass, JobOptions, send_job};

use crate::traits::PlatformBridge;

/// Result delivered to a discovery callback: the JSON array of
/// `{address, friendlyName}` records, or a human-readable error whose
/// `Display` is the alert text.
pub type DiscoveryOutcome = std::result::Result<String, HumanError>;

/// Forwards UI requests to the printer client layer.
///
/// Cheap to clone; clones share the same transport.
#[derive(Clone)]
pub struct PrinterBridge {
    connector: Arc<dyn ConnectionProvider>,
    discoverer: Arc<dyn Discoverer>,
    options: JobOptions,
}

impl PrinterBridge {
    pub fn new(
        connector: Arc<dyn ConnectionProvider>,
        discoverer: Arc<dyn Discoverer>,
        config: &AppConfig,
    ) -> Self {
        Self {
            connector,
            discoverer,
            options: JobOptions {
                mode: config.payload_mode,
                language_timeout: config.language_query_timeout(),
            },
        }
    }

    /// Build a bridge on the transport the platform provides.
    pub fn for_platform(platform: &dyn PlatformBridge, config: &AppConfig) -> Result<Self> {
        let connector = platform.connector(config)?;
        let discoverer = platform.discoverer(config)?;
        info!(platform = platform.platform_name(), mode = ?config.payload_mode, "printer bridge ready");
        Ok(Self::new(connector, discoverer, config))
    }

    // -- Write ---------------------------------------------------------------

    /// Open, detect language, write and close, reporting what happened.
    pub async fn try_write(&self, address: &str, payload: &str) -> Result<WriteOutcome> {
        let mut connection = self.connector.connection(address);
        send_job(connection.as_mut(), payload, self.options).await
    }

    /// Write to the printer at `address`. Errors are logged and swallowed.
    pub async fn write(&self, address: &str, payload: &str) {
        info!(address, payload_len = payload.len(), "going to write via Bluetooth");

        match self.try_write(address, payload).await {
            Ok(outcome) => debug!(address, ?outcome, "write finished"),
            Err(e @ LabelwerkError::Connection { .. }) => {
                error!(address, error = %e, "connection error");
            }
            Err(e @ LabelwerkError::LanguageUnknown(_)) => {
                error!(address, error = %e, "printer language unknown");
            }
            Err(e) => error!(address, error = %e, "write failed"),
        }
    }

    /// Run [`write`](Self::write) on the runtime without waiting for it.
    pub fn spawn_write(&self, address: String, payload: String) -> JoinHandle<()> {
        let bridge = self.clone();
        tokio::spawn(async move { bridge.write(&address, &payload).await })
    }

    // -- Discovery -------------------------------------------------------------

    /// Run one discovery pass and return the serialized records.
    pub async fn discover_json(&self) -> Result<String> {
        DiscoveryPass::new().run(self.discoverer.as_ref()).await
    }

    /// Start a discovery pass in the background.
    ///
    /// `on_result` runs exactly once, off the caller's stack, with either the
    /// JSON array (`"[]"` when nothing was found) or a [`HumanError`].
    pub fn discover<F>(&self, on_result: F) -> JoinHandle<()>
    where
        F: FnOnce(DiscoveryOutcome) + Send + 'static,
    {
        let bridge = self.clone();
        tokio::spawn(async move {
            let outcome = bridge.discover_json().await.map_err(|e| humanize_error(&e));
            on_result(outcome);
        })
    }
}
