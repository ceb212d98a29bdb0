// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::types::{PayloadMode, PrinterLanguage, WriteOutcome};
use labelwerk_print::connection::Connection;
use labelwerk_print::labels::{CPCL_TEST_LABEL, ZPL_TEST_LABEL};
use labelwerk_print::language::LANGUAGE_QUERY;
use labelwerk_print::{JobOptions, send_job};

/// What the fake printer saw.
#[derive(Default)]
struct Wire {
    writes: Vec<Vec<u8>>,
    opened: bool,
    closed: bool,
}

struct FakePrinter {
    wire: Arc<Mutex<Wire>>,
    language_reply: &'static [u8],
    fail_open: bool,
    fail_payload_write: bool,
    connected: bool,
}

impl FakePrinter {
    fn answering(language_reply: &'static [u8]) -> (Self, Arc<Mutex<Wire>>) {
        let wire = Arc::new(Mutex::new(Wire::default()));
        let printer = Self {
            wire: Arc::clone(&wire),
            language_reply,
            fail_open: false,
            fail_payload_write: false,
            connected: false,
        };
        (printer, wire)
    }
}

#[async_trait]
impl Connection for FakePrinter {
    fn address(&self) -> &str {
        "AC:3F:A4:00:00:01"
    }

    async fn open(&mut self) -> Result<()> {
        if self.fail_open {
            return Err(LabelwerkError::connection(self.address(), "host is down"));
        }
        self.connected = true;
        self.wire.lock().unwrap().opened = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        if self.fail_payload_write && data != LANGUAGE_QUERY {
            return Err(LabelwerkError::connection(self.address(), "write failed: broken pipe"));
        }
        self.wire.lock().unwrap().writes.push(data.to_vec());
        Ok(())
    }

    async fn read_with_timeout(&mut self, _max_wait: Duration) -> Result<Vec<u8>> {
        Ok(self.language_reply.to_vec())
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.wire.lock().unwrap().closed = true;
        Ok(())
    }
}

fn options(mode: PayloadMode) -> JobOptions {
    JobOptions {
        mode,
        language_timeout: Duration::from_millis(50),
    }
}

#[tokio::test]
async fn zpl_printer_gets_the_zpl_test_label() {
    let (mut printer, wire) = FakePrinter::answering(b"\"zpl\"");

    let outcome = send_job(&mut printer, "ignored", options(PayloadMode::TestLabel))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        WriteOutcome::Written {
            language: PrinterLanguage::Zpl,
            bytes: ZPL_TEST_LABEL.len()
        }
    );
    let wire = wire.lock().unwrap();
    assert_eq!(wire.writes, vec![LANGUAGE_QUERY.to_vec(), ZPL_TEST_LABEL.to_vec()]);
    assert!(wire.closed);
}

#[tokio::test]
async fn line_print_printer_gets_the_cpcl_test_label() {
    let (mut printer, wire) = FakePrinter::answering(b"\"line_print\"\r\n");

    send_job(&mut printer, "", options(PayloadMode::TestLabel)).await.unwrap();

    assert_eq!(wire.lock().unwrap().writes.last().unwrap(), CPCL_TEST_LABEL);
}

#[tokio::test]
async fn unrecognized_language_writes_nothing_but_the_query() {
    let (mut printer, wire) = FakePrinter::answering(b"\"escpos\"");

    let outcome = send_job(&mut printer, "^XA^XZ", options(PayloadMode::Custom)).await.unwrap();

    assert!(matches!(outcome, WriteOutcome::Skipped { .. }));
    let wire = wire.lock().unwrap();
    assert_eq!(wire.writes, vec![LANGUAGE_QUERY.to_vec()]);
    assert!(wire.closed);
}

#[tokio::test]
async fn custom_mode_sends_the_callers_text() {
    let (mut printer, wire) = FakePrinter::answering(b"\"zpl\"");
    let zpl = "^XA^FO50,50^A0N,50,50^FDHello World^FS^XZ";

    send_job(&mut printer, zpl, options(PayloadMode::Custom)).await.unwrap();

    assert_eq!(wire.lock().unwrap().writes.last().unwrap(), zpl.as_bytes());
}

#[tokio::test]
async fn silent_printer_is_a_detection_failure_and_still_closes() {
    let (mut printer, wire) = FakePrinter::answering(b"");

    let err = send_job(&mut printer, "", options(PayloadMode::TestLabel)).await.unwrap_err();

    assert!(matches!(err, LabelwerkError::LanguageUnknown(_)));
    assert!(wire.lock().unwrap().closed);
}

#[tokio::test]
async fn failed_open_still_attempts_close() {
    let (mut printer, wire) = FakePrinter::answering(b"\"zpl\"");
    printer.fail_open = true;

    let err = send_job(&mut printer, "", options(PayloadMode::TestLabel)).await.unwrap_err();

    assert!(matches!(err, LabelwerkError::Connection { .. }));
    let wire = wire.lock().unwrap();
    assert!(!wire.opened);
    assert!(wire.writes.is_empty());
    assert!(wire.closed);
}

#[tokio::test]
async fn failed_payload_write_still_closes() {
    let (mut printer, wire) = FakePrinter::answering(b"\"cpcl\"");
    printer.fail_payload_write = true;

    let err = send_job(&mut printer, "", options(PayloadMode::TestLabel)).await.unwrap_err();

    assert!(err.to_string().contains("broken pipe"));
    assert!(wire.lock().unwrap().closed);
}
