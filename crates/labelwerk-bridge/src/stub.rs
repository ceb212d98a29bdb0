// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop bridge.
//
// Desktop systems have no runtime Bluetooth permission prompt. On Linux the
// transport is BlueZ via `labelwerk-print::bluetooth`; everywhere else the
// transport methods return `PlatformUnavailable`.

use std::sync::Arc;

use labelwerk_core::AppConfig;
use labelwerk_core::error::Result;
use labelwerk_core::types::PermissionStatus;
use labelwerk_print::{ConnectionProvider, Discoverer};

use crate::traits::*;

/// Bridge returned on non-mobile platforms.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        if cfg!(target_os = "linux") {
            "Linux (BlueZ)"
        } else {
            "Desktop (stub)"
        }
    }
}

impl NativePermissions for StubBridge {
    fn request_bluetooth_permissions(&self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::NotRequired)
    }
}

#[cfg(target_os = "linux")]
impl NativeBluetoothPrint for StubBridge {
    fn connector(&self, config: &AppConfig) -> Result<Arc<dyn ConnectionProvider>> {
        use labelwerk_print::bluetooth::BluetoothConnector;
        Ok(Arc::new(BluetoothConnector::new(config.rfcomm_channel)))
    }

    fn discoverer(&self, config: &AppConfig) -> Result<Arc<dyn Discoverer>> {
        use labelwerk_print::bluetooth::BluetoothDiscoverer;
        Ok(Arc::new(BluetoothDiscoverer::new(
            config.discovery_timeout(),
            config.printers_only,
        )))
    }
}

#[cfg(not(target_os = "linux"))]
impl NativeBluetoothPrint for StubBridge {
    fn connector(&self, _config: &AppConfig) -> Result<Arc<dyn ConnectionProvider>> {
        tracing::warn!("NativeBluetoothPrint::connector called on stub bridge");
        Err(labelwerk_core::LabelwerkError::PlatformUnavailable)
    }

    fn discoverer(&self, _config: &AppConfig) -> Result<Arc<dyn Discoverer>> {
        tracing::warn!("NativeBluetoothPrint::discoverer called on stub bridge");
        Err(labelwerk_core::LabelwerkError::PlatformUnavailable)
    }
}
