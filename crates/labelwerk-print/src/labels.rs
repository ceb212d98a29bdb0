// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canned test labels and payload selection.

use labelwerk_core::types::{PayloadMode, PrinterLanguage};

/// ZPL test label: an 8-dot box with "TEST" in large type.
pub const ZPL_TEST_LABEL: &[u8] = b"^XA^FO17,16^GB379,371,8^FS^FT65,255^A0N,135,134^FDTEST^FS^XZ";

/// CPCL test label: line-oriented setup, a box, "TEST" and PRINT.
pub const CPCL_TEST_LABEL: &[u8] = b"! 0 200 200 406 1\r\n\
ON-FEED IGNORE\r\n\
BOX 20 20 380 380 8\r\n\
T 0 6 137 177 TEST\r\n\
PRINT\r\n";

/// Test label bytes for `language`; empty when we have no label for it.
pub fn test_label(language: &PrinterLanguage) -> &'static [u8] {
    match language {
        PrinterLanguage::Zpl => ZPL_TEST_LABEL,
        PrinterLanguage::Cpcl | PrinterLanguage::LinePrint => CPCL_TEST_LABEL,
        PrinterLanguage::Unrecognized(_) => &[],
    }
}

/// Bytes a write sends for `language` under `mode`.
///
/// Unrecognized languages always yield an empty payload so nothing is sent
/// to a printer that would misinterpret it.
pub fn select_payload<'a>(
    mode: PayloadMode,
    language: &PrinterLanguage,
    custom: &'a str,
) -> &'a [u8] {
    match (mode, language) {
        (_, PrinterLanguage::Unrecognized(_)) => &[],
        (PayloadMode::TestLabel, known) => test_label(known),
        (PayloadMode::Custom, _) => custom.as_bytes(),
    }
}
