// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the alert dialogs.
//
// Every technical error is mapped to a plain message, a suggestion and a
// severity level. The printer screen colours its alert by severity.

use std::fmt;

use crate::error::LabelwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Printer out of range, radio busy. Trying again may work.
    Transient,
    /// User must do something (switch Bluetooth on, grant permission).
    ActionRequired,
    /// Retrying won't help on this device.
    Permanent,
}

/// A human-readable error for display in an alert.
///
/// Displays as the message followed by the suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// Plain English summary (shown as the alert heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    pub severity: Severity,
}

impl fmt::Display for HumanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `LabelwerkError` into a `HumanError`.
pub fn humanize_error(err: &LabelwerkError) -> HumanError {
    match err {
        LabelwerkError::Connection { address, detail } => humanize_connection_error(address, detail),

        LabelwerkError::LanguageUnknown(_) => HumanError {
            message: "The printer didn't say which language it speaks.".into(),
            suggestion: "Make sure this is a ZPL or CPCL label printer and that it has finished starting up.".into(),
            severity: Severity::Transient,
        },

        LabelwerkError::Discovery(detail) => {
            let lower = detail.to_ascii_lowercase();
            if lower.contains("powered") || lower.contains("adapter") {
                HumanError {
                    message: "Bluetooth is not available.".into(),
                    suggestion: "Switch Bluetooth on, then search again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if lower.contains("permission") || lower.contains("not authorized") {
                HumanError {
                    message: "The app isn't allowed to scan for devices.".into(),
                    suggestion: "Allow the Nearby devices permission in the system settings.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "We couldn't search for printers.".into(),
                    suggestion: format!("Make sure the printer is switched on and discoverable. ({detail})"),
                    severity: Severity::Transient,
                }
            }
        }

        LabelwerkError::Bridge(_) => HumanError {
            message: "A device-specific feature didn't work.".into(),
            suggestion: "Try restarting the app.".into(),
            severity: Severity::Transient,
        },

        LabelwerkError::PlatformUnavailable => HumanError {
            message: "Bluetooth printing isn't available on this device.".into(),
            suggestion: "Use a phone or a Linux computer with Bluetooth.".into(),
            severity: Severity::Permanent,
        },

        LabelwerkError::Io(_) => HumanError {
            message: "There was a problem reading or writing a file.".into(),
            suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
            severity: Severity::Transient,
        },

        LabelwerkError::Serialization(_) => HumanError {
            message: "The printer list couldn't be read.".into(),
            suggestion: "Search for printers again.".into(),
            severity: Severity::Transient,
        },
    }
}

fn humanize_connection_error(address: &str, detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("invalid") && lower.contains("address") {
        HumanError {
            message: "That printer address doesn't look right.".into(),
            suggestion: "It should look like AC:3F:A4:12:34:56.".into(),
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("timed out") || lower.contains("host is down") {
        HumanError {
            message: "The printer didn't answer.".into(),
            suggestion: format!("Make sure {address} is switched on and close by, then try again."),
            severity: Severity::Transient,
        }
    } else {
        HumanError {
            message: "We couldn't connect to the printer.".into(),
            suggestion: format!("Try again. If this keeps happening, switch the printer off and on. (Detail: {detail})"),
            severity: Severity::Transient,
        }
    }
}
