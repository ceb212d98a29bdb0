// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use labelwerk_bridge::{DiscoveryOutcome, PrinterBridge};
use labelwerk_core::AppConfig;
use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::human_errors::Severity;
use labelwerk_core::types::{DiscoveredPrinter, PayloadMode, PrinterLanguage, WriteOutcome};
use labelwerk_print::{Connection, ConnectionProvider, Discoverer, DiscoveryHandler};
use tokio::sync::oneshot;

// -- Fakes --------------------------------------------------------------------

/// Every byte string written to any connection, in order.
type Log = Arc<Mutex<Vec<Vec<u8>>>>;

struct FakeConnector {
    reply: &'static [u8],
    reachable: bool,
    log: Log,
}

struct FakeConnection {
    address: String,
    reply: &'static [u8],
    reachable: bool,
    open: bool,
    log: Log,
}

impl ConnectionProvider for FakeConnector {
    fn connection(&self, address: &str) -> Box<dyn Connection> {
        Box::new(FakeConnection {
            address: address.to_string(),
            reply: self.reply,
            reachable: self.reachable,
            open: false,
            log: Arc::clone(&self.log),
        })
    }
}

#[async_trait]
impl Connection for FakeConnection {
    fn address(&self) -> &str {
        &self.address
    }

    async fn open(&mut self) -> Result<()> {
        if !self.reachable {
            return Err(LabelwerkError::connection(&self.address, "host is down"));
        }
        self.open = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.open
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.log.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    async fn read_with_timeout(&mut self, _max_wait: Duration) -> Result<Vec<u8>> {
        Ok(self.reply.to_vec())
    }

    async fn close(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }
}

struct FakeDiscoverer {
    devices: Vec<DiscoveredPrinter>,
    error: Option<LabelwerkError>,
}

#[async_trait]
impl Discoverer for FakeDiscoverer {
    async fn find_printers(&self, handler: &mut dyn DiscoveryHandler) -> Result<()> {
        for device in &self.devices {
            handler.found_printer(device.clone());
        }
        match &self.error {
            Some(LabelwerkError::Discovery(detail)) => Err(LabelwerkError::Discovery(detail.clone())),
            Some(_) => Err(LabelwerkError::PlatformUnavailable),
            None => Ok(()),
        }
    }
}

fn bridge(
    reply: &'static [u8],
    reachable: bool,
    devices: Vec<DiscoveredPrinter>,
    error: Option<LabelwerkError>,
    config: &AppConfig,
) -> (PrinterBridge, Log) {
    let log = Log::default();
    let connector = FakeConnector {
        reply,
        reachable,
        log: Arc::clone(&log),
    };
    let bridge = PrinterBridge::new(
        Arc::new(connector),
        Arc::new(FakeDiscoverer { devices, error }),
        config,
    );
    (bridge, log)
}

/// Run `discover` and collect every callback invocation.
async fn discover_all(bridge: &PrinterBridge) -> Vec<DiscoveryOutcome> {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let (tx, rx) = oneshot::channel();
    bridge.discover(move |outcome| {
        sink.lock().unwrap().push(outcome);
        let _ = tx.send(());
    });
    rx.await.unwrap();
    // Give a second (erroneous) invocation the chance to show up.
    tokio::task::yield_now().await;
    let calls = calls.lock().unwrap().clone();
    calls
}

// -- Discovery ----------------------------------------------------------------

#[tokio::test]
async fn discovery_with_no_devices_reports_empty_array_once() {
    let (bridge, _) = bridge(b"", true, vec![], None, &AppConfig::default());
    let calls = discover_all(&bridge).await;
    assert_eq!(calls, vec![Ok("[]".to_string())]);
}

#[tokio::test]
async fn discovery_reports_records_in_order() {
    let devices = vec![
        DiscoveredPrinter::new("AC:3F:A4:00:00:01", Some("ZQ520".into())),
        DiscoveredPrinter::new("AC:3F:A4:00:00:02", None),
    ];
    let (bridge, _) = bridge(b"", true, devices, None, &AppConfig::default());

    let calls = discover_all(&bridge).await;
    assert_eq!(calls.len(), 1);
    let json = calls[0].as_ref().unwrap();
    let value: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            {"address": "AC:3F:A4:00:00:01", "friendlyName": "ZQ520"},
            {"address": "AC:3F:A4:00:00:02", "friendlyName": "Unknown"},
        ])
    );
}

#[tokio::test]
async fn discovery_failure_reports_readable_error_once() {
    let devices = vec![DiscoveredPrinter::new("AC:3F:A4:00:00:01", None)];
    let error = LabelwerkError::Discovery("adapter is not powered".into());
    let (bridge, _) = bridge(b"", true, devices, Some(error), &AppConfig::default());

    let calls = discover_all(&bridge).await;
    assert_eq!(calls.len(), 1);
    let human = calls[0].as_ref().unwrap_err();
    assert!(!human.to_string().is_empty());
    assert!(human.message.contains("Bluetooth"));
    assert_eq!(human.severity, Severity::ActionRequired);
}

#[tokio::test]
async fn discover_json_returns_typed_error() {
    let error = LabelwerkError::Discovery("inquiry aborted".into());
    let (bridge, _) = bridge(b"", true, vec![], Some(error), &AppConfig::default());
    let err = bridge.discover_json().await.unwrap_err();
    assert!(matches!(err, LabelwerkError::Discovery(_)));
}

// -- Write --------------------------------------------------------------------

#[tokio::test]
async fn try_write_sends_test_label_for_zpl_printer() {
    let (bridge, log) = bridge(b"\"zpl\"", true, vec![], None, &AppConfig::default());

    let outcome = bridge
        .try_write("AC:3F:A4:00:00:01", "ignored in test-label mode")
        .await
        .unwrap();

    match outcome {
        WriteOutcome::Written { language, bytes } => {
            assert_eq!(language, PrinterLanguage::Zpl);
            assert!(bytes > 0);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2);
    assert!(log[1].starts_with(b"^XA"));
}

#[tokio::test]
async fn try_write_sends_caller_payload_in_custom_mode() {
    let config = AppConfig {
        payload_mode: PayloadMode::Custom,
        ..AppConfig::default()
    };
    let (bridge, log) = bridge(b"\"line_print\"", true, vec![], None, &config);

    bridge
        .try_write("AC:3F:A4:00:00:01", "! 0 200 200 10 1\r\nPRINT\r\n")
        .await
        .unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.last().unwrap(), b"! 0 200 200 10 1\r\nPRINT\r\n");
}

#[tokio::test]
async fn try_write_reports_connection_error() {
    let (bridge, log) = bridge(b"\"zpl\"", false, vec![], None, &AppConfig::default());
    let err = bridge.try_write("AC:3F:A4:00:00:01", "").await.unwrap_err();
    assert!(matches!(err, LabelwerkError::Connection { .. }));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn write_swallows_errors() {
    let (bridge, log) = bridge(b"", false, vec![], None, &AppConfig::default());
    // Returns unit and does not panic.
    bridge.write("not-an-address", "anything").await;
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn spawn_write_completes_in_background() {
    let (bridge, log) = bridge(b"\"cpcl\"", true, vec![], None, &AppConfig::default());
    bridge
        .spawn_write("AC:3F:A4:00:00:01".into(), String::new())
        .await
        .unwrap();
    let log = log.lock().unwrap();
    assert!(log.last().unwrap().starts_with(b"! 0 200 200 406 1"));
}
