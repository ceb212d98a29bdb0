// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::PayloadMode;

/// File name of the persisted settings inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Sample ZPL shown in the payload field on first launch.
pub const DEFAULT_PAYLOAD: &str = "^XA^FO50,50^A0N,50,50^FDHello World^FS^XZ";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Whether writes send the canned test label or the user's text.
    pub payload_mode: PayloadMode,
    /// Initial contents of the payload field.
    pub default_payload: String,
    /// RFCOMM channel of the printer's Serial Port Profile service.
    pub rfcomm_channel: u8,
    /// How long one discovery pass listens for devices.
    pub discovery_timeout_secs: u64,
    /// Maximum wait for the printer to answer the language query.
    pub language_query_timeout_ms: u64,
    /// Only report devices whose Class of Device says "printer".
    pub printers_only: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            payload_mode: PayloadMode::TestLabel,
            default_payload: DEFAULT_PAYLOAD.to_owned(),
            rfcomm_channel: 1,
            discovery_timeout_secs: 10,
            language_query_timeout_ms: 5000,
            printers_only: true,
        }
    }
}

impl AppConfig {
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }

    pub fn language_query_timeout(&self) -> Duration {
        Duration::from_millis(self.language_query_timeout_ms)
    }

    /// Load settings from `dir/config.json`.
    ///
    /// `Ok(None)` means there is no settings file yet. A file that exists but
    /// cannot be read or parsed is an error; the file is left untouched.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let data = match std::fs::read_to_string(dir.join(CONFIG_FILE)) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Persist settings to `dir/config.json`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE), json)?;
        Ok(())
    }
}
