// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Labelwerk Print. The printer client layer covers connections,
// command-language detection, canned test labels, print jobs and discovery
// passes. The BlueZ transport is compiled on Linux only; other platforms plug
// their own `Connection` and `Discoverer` in through `labelwerk-bridge`.

pub mod connection;
pub mod discovery;
pub mod job;
pub mod labels;
pub mod language;

#[cfg(target_os = "linux")]
pub mod bluetooth;

pub use connection::{Connection, ConnectionProvider};
pub use discovery::{Discoverer, DiscoveryHandler, DiscoveryPass};
pub use job::{JobOptions, send_job};
