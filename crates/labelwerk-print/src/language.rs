// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer control language detection.
//
// The printer is asked over the open connection with a Set-Get-Do query:
//
//     ! U1 getvar "device.languages"\r\n
//
// and answers with a quoted value such as `"zpl"`, `"hybrid_xml_zpl"` or
// `"line_print"`. Mobile printers in CPCL mode answer `"cpcl"` (some older
// firmware reports `"epl_cpcl"` style combinations).

use std::time::Duration;

use tracing::{debug, info, warn};

use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::types::PrinterLanguage;

use crate::connection::Connection;

/// SGD query for the active command language.
pub const LANGUAGE_QUERY: &[u8] = b"! U1 getvar \"device.languages\"\r\n";

/// Ask the printer which command language it is running.
///
/// An empty or missing answer is a detection failure
/// ([`LabelwerkError::LanguageUnknown`]); an answer we can't map is returned
/// as [`PrinterLanguage::Unrecognized`].
pub async fn detect_language(
    connection: &mut dyn Connection,
    max_wait: Duration,
) -> Result<PrinterLanguage> {
    debug!(address = connection.address(), "querying device.languages");
    connection.write(LANGUAGE_QUERY).await?;
    let response = connection.read_with_timeout(max_wait).await?;

    let language = parse_language_response(&response)?;
    match language {
        PrinterLanguage::Unrecognized(ref raw) => {
            warn!(address = connection.address(), raw = %raw, "printer reported an unrecognized language");
        }
        ref known => {
            info!(address = connection.address(), language = %known, "printer language detected");
        }
    }
    Ok(language)
}

/// Map a raw `device.languages` answer onto a [`PrinterLanguage`].
pub fn parse_language_response(response: &[u8]) -> Result<PrinterLanguage> {
    let text = String::from_utf8_lossy(response);
    let value = text
        .trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\0')
        .to_ascii_lowercase();

    if value.is_empty() {
        return Err(LabelwerkError::LanguageUnknown(
            "printer did not answer the device.languages query".into(),
        ));
    }

    let language = if value.contains("zpl") {
        PrinterLanguage::Zpl
    } else if value.contains("line_print") {
        PrinterLanguage::LinePrint
    } else if value.contains("cpcl") {
        PrinterLanguage::Cpcl
    } else {
        PrinterLanguage::Unrecognized(value)
    };
    Ok(language)
}
