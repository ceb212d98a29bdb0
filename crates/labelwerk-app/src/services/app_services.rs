// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer. Loads settings, picks the platform bridge and
// exposes the printer operations to the Dioxus UI.
//
// Discovery results come back on a runtime worker; they are handed to the
// UI through a oneshot channel so only the UI task touches signals.

use std::path::Path;
use std::sync::Arc;

use labelwerk_bridge::traits::PlatformBridge;
use labelwerk_bridge::{DiscoveryOutcome, PrinterBridge, platform_bridge};
use labelwerk_core::AppConfig;
use labelwerk_core::LabelwerkError;
use labelwerk_core::human_errors::{HumanError, humanize_error};
use labelwerk_core::types::PermissionStatus;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use super::data_dir;

/// Shared application services accessible from the printer screen via
/// `use_context::<AppServices>()`.
#[derive(Clone)]
pub struct AppServices {
    platform: Arc<dyn PlatformBridge>,
    printer: Option<PrinterBridge>,
    /// Why the platform has no usable transport, if it has none.
    unavailable: Option<HumanError>,
    config: AppConfig,
}

impl AppServices {
    /// Initialise all services. Call once at app startup.
    pub fn init() -> Self {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");
        let config = load_config(&dir);
        Self::new(Arc::from(platform_bridge()), config)
    }

    pub fn new(platform: Arc<dyn PlatformBridge>, config: AppConfig) -> Self {
        let (printer, unavailable) = match PrinterBridge::for_platform(platform.as_ref(), &config) {
            Ok(bridge) => (Some(bridge), None),
            Err(e) => {
                warn!(platform = platform.platform_name(), error = %e, "no Bluetooth transport");
                (None, Some(humanize_error(&e)))
            }
        };
        Self {
            platform,
            printer,
            unavailable,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // -- Permissions -----------------------------------------------------------

    /// Ask for the Bluetooth permissions and log the outcome. Never fails.
    pub fn request_bluetooth_permissions(&self) {
        match self.platform.request_bluetooth_permissions() {
            Ok(PermissionStatus::Granted) => info!("Bluetooth permissions granted."),
            Ok(PermissionStatus::Denied) => info!("Bluetooth permissions denied."),
            Ok(PermissionStatus::Requested) => info!("Bluetooth permissions requested."),
            Ok(PermissionStatus::NotRequired) => {
                info!(platform = self.platform.platform_name(), "Bluetooth permissions not required");
            }
            Err(e) => warn!(error = %e, "Bluetooth permission request failed"),
        }
    }

    // -- Printing --------------------------------------------------------------

    /// Fire-and-forget write; the outcome only reaches the log.
    pub fn write(&self, address: String, payload: String) {
        match &self.printer {
            Some(bridge) => {
                bridge.spawn_write(address, payload);
            }
            None => error!(address = %address, "write skipped: no Bluetooth transport"),
        }
    }

    // -- Discovery -------------------------------------------------------------

    /// Run one discovery pass and wait for its single result.
    pub async fn discover(&self) -> DiscoveryOutcome {
        let Some(bridge) = &self.printer else {
            return Err(self
                .unavailable
                .clone()
                .unwrap_or_else(|| humanize_error(&LabelwerkError::PlatformUnavailable)));
        };

        let (tx, rx) = oneshot::channel();
        bridge.discover(move |outcome| {
            let _ = tx.send(outcome);
        });
        rx.await.unwrap_or_else(|_| {
            Err(humanize_error(&LabelwerkError::Discovery(
                "discovery ended without a result".into(),
            )))
        })
    }
}

// -- Config file persistence -------------------------------------------------

/// Load settings from `dir`, writing the defaults out on first run.
///
/// An unreadable or malformed file is kept as it is and the defaults are
/// used in memory only.
fn load_config(dir: &Path) -> AppConfig {
    match AppConfig::load(dir) {
        Ok(Some(config)) => config,
        Ok(None) => {
            let config = AppConfig::default();
            if let Err(e) = config.save(dir) {
                warn!(error = %e, "could not write default settings");
            }
            config
        }
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "settings file unusable, using defaults");
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelwerk_core::config::CONFIG_FILE;
    use labelwerk_core::types::PayloadMode;

    #[test]
    fn first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn existing_settings_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"payload_mode":"Custom","rfcomm_channel":3}"#,
        )
        .unwrap();

        let config = load_config(dir.path());
        assert_eq!(config.payload_mode, PayloadMode::Custom);
        assert_eq!(config.rfcomm_channel, 3);
        assert_eq!(config.discovery_timeout_secs, 10);
    }

    #[test]
    fn malformed_settings_are_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let broken = r#"{"payload_mode":"Custom","rfcomm_channel":3,}"#;
        std::fs::write(&path, broken).unwrap();

        let config = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
    }
}
