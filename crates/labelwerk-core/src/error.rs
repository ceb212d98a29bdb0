// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Labelwerk.

use thiserror::Error;

/// Top-level error type for all Labelwerk operations.
#[derive(Debug, Error)]
pub enum LabelwerkError {
    // -- Printer connection --
    #[error("connection to {address} failed: {detail}")]
    Connection { address: String, detail: String },

    #[error("printer language could not be determined: {0}")]
    LanguageUnknown(String),

    // -- Discovery --
    #[error("printer discovery failed: {0}")]
    Discovery(String),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Storage / serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LabelwerkError {
    /// Shorthand for a connection failure against `address`.
    pub fn connection(address: &str, detail: impl std::fmt::Display) -> Self {
        Self::Connection {
            address: address.to_owned(),
            detail: detail.to_string(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LabelwerkError>;
