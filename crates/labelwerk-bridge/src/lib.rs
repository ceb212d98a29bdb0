// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Labelwerk — native platform bridge and printer bridge module.
//!
//! `traits` defines what a platform must provide (runtime permissions and a
//! Bluetooth transport); `android` and `stub` implement it. `PrinterBridge`
//! sits on top and is the only thing the UI talks to.

pub mod printer_bridge;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

pub use printer_bridge::{DiscoveryOutcome, PrinterBridge};

/// Retrieves the bridge implementation for the target operating system.
pub fn platform_bridge() -> Box<dyn traits::PlatformBridge> {
    #[cfg(target_os = "android")]
    {
        // Android: `jni-rs` calls into the Android Bluetooth and permission APIs.
        Box::new(android::AndroidBridge::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // Desktop/CI: BlueZ on Linux, unavailable elsewhere.
        Box::new(stub::StubBridge)
    }
}
