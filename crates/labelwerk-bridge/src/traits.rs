// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use std::sync::Arc;

use labelwerk_core::AppConfig;
use labelwerk_core::error::Result;
use labelwerk_core::types::PermissionStatus;
use labelwerk_print::{ConnectionProvider, Discoverer};

/// Unified bridge that groups the native capabilities the printer screen
/// needs.
pub trait PlatformBridge: NativePermissions + NativeBluetoothPrint + Send + Sync {
    /// Human-readable platform name (e.g. "Android", "Linux (BlueZ)").
    fn platform_name(&self) -> &str;
}

/// Runtime permissions for Bluetooth scanning and connecting.
pub trait NativePermissions {
    /// Ask for the Bluetooth connect and scan permissions.
    ///
    /// Never blocks waiting for the user; on platforms where the answer
    /// arrives asynchronously this returns [`PermissionStatus::Requested`].
    fn request_bluetooth_permissions(&self) -> Result<PermissionStatus>;
}

/// Bluetooth Classic transport for label printers.
pub trait NativeBluetoothPrint {
    /// Connection factory used for writes.
    fn connector(&self, config: &AppConfig) -> Result<Arc<dyn ConnectionProvider>>;

    /// Device source used for discovery passes.
    ///
    /// What a pass can see depends on the platform. BlueZ runs a live
    /// inquiry and reports nearby devices. Android reports only the adapter's
    /// bonded (paired) devices, so a printer has to be paired in the system
    /// settings before it shows up there.
    fn discoverer(&self, config: &AppConfig) -> Result<Arc<dyn Discoverer>>;
}
