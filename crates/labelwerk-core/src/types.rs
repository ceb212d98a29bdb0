// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Labelwerk.

use serde::{Deserialize, Deserializer, Serialize};

/// Display name used when a discovered device does not report one.
pub const UNKNOWN_FRIENDLY_NAME: &str = "Unknown";

fn unknown_friendly_name() -> String {
    UNKNOWN_FRIENDLY_NAME.to_owned()
}

fn friendly_name_or_unknown(name: Option<String>) -> String {
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or_else(unknown_friendly_name)
}

/// `null`, `""` and whitespace-only names all become [`UNKNOWN_FRIENDLY_NAME`].
fn deserialize_friendly_name<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(friendly_name_or_unknown)
}

/// A printer found during one discovery pass.
///
/// Serialized as `{"address": ..., "friendlyName": ...}`, which is the shape
/// the UI receives over the discovery callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredPrinter {
    /// Transport address, e.g. a Bluetooth MAC like `AC:3F:A4:12:34:56`.
    pub address: String,
    #[serde(
        default = "unknown_friendly_name",
        deserialize_with = "deserialize_friendly_name"
    )]
    pub friendly_name: String,
}

impl DiscoveredPrinter {
    /// Build a record, falling back to [`UNKNOWN_FRIENDLY_NAME`] when the
    /// device did not report a usable name.
    pub fn new(address: impl Into<String>, friendly_name: Option<String>) -> Self {
        Self {
            address: address.into(),
            friendly_name: friendly_name_or_unknown(friendly_name),
        }
    }
}

/// Printer control language reported by the printer itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrinterLanguage {
    Zpl,
    Cpcl,
    /// Line-print mode; shares the CPCL command set for test labels.
    LinePrint,
    /// A language the printer reported that we have no label for.
    Unrecognized(String),
}

impl std::fmt::Display for PrinterLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zpl => f.write_str("ZPL"),
            Self::Cpcl => f.write_str("CPCL"),
            Self::LinePrint => f.write_str("LINE_PRINT"),
            Self::Unrecognized(raw) => write!(f, "unrecognized ({raw})"),
        }
    }
}

/// Which bytes a write sends once the printer language is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PayloadMode {
    /// Send the canned test label for the detected language and ignore the
    /// caller's text.
    #[default]
    TestLabel,
    /// Send the caller's text as UTF-8, provided the language is recognized.
    Custom,
}

/// Result of a write that reached the printer-language stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Bytes were written to the printer.
    Written {
        language: PrinterLanguage,
        bytes: usize,
    },
    /// The selected payload was empty, so nothing was written.
    Skipped { language: PrinterLanguage },
    /// The connection reported itself closed right after opening.
    NotConnected,
}

/// Outcome of the runtime permission request made when the screen mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// The platform has no runtime Bluetooth permissions (desktop, old Android).
    NotRequired,
    Granted,
    Denied,
    /// The system dialog was shown; the answer arrives later via the Activity.
    Requested,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_name_falls_back_to_unknown() {
        let printer = DiscoveredPrinter::new("AC:3F:A4:00:00:01", None);
        assert_eq!(printer.friendly_name, "Unknown");

        let blank = DiscoveredPrinter::new("AC:3F:A4:00:00:02", Some("  ".into()));
        assert_eq!(blank.friendly_name, "Unknown");
    }

    #[test]
    fn serializes_with_friendly_name_key() {
        let printer = DiscoveredPrinter::new("AC:3F:A4:00:00:01", Some("XXZKJ123".into()));
        let json = serde_json::to_string(&printer).unwrap();
        assert_eq!(json, r#"{"address":"AC:3F:A4:00:00:01","friendlyName":"XXZKJ123"}"#);
    }

    #[test]
    fn deserializing_without_name_uses_unknown() {
        let printer: DiscoveredPrinter =
            serde_json::from_str(r#"{"address":"AC:3F:A4:00:00:01"}"#).unwrap();
        assert_eq!(printer.friendly_name, UNKNOWN_FRIENDLY_NAME);
    }

    #[test]
    fn deserializing_null_or_blank_name_uses_unknown() {
        for json in [
            r#"{"address":"A","friendlyName":null}"#,
            r#"{"address":"A","friendlyName":""}"#,
            r#"{"address":"A","friendlyName":"   "}"#,
        ] {
            let printer: DiscoveredPrinter = serde_json::from_str(json).unwrap();
            assert_eq!(printer, DiscoveredPrinter::new("A", None), "{json}");
        }
    }

    #[test]
    fn language_display_matches_sdk_names() {
        assert_eq!(PrinterLanguage::Zpl.to_string(), "ZPL");
        assert_eq!(PrinterLanguage::LinePrint.to_string(), "LINE_PRINT");
    }
}
