// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer screen state. Held in a Dioxus signal by the page, kept free of
// Dioxus types so the transitions can be unit tested.

use labelwerk_bridge::DiscoveryOutcome;
use labelwerk_core::AppConfig;
use labelwerk_core::human_errors::{Severity, humanize_error};
use labelwerk_core::types::DiscoveredPrinter;
use labelwerk_print::discovery::parse_printers;

/// A modal alert: title plus one line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    /// Set for errors; picks the alert's accent colour.
    pub severity: Option<Severity>,
}

impl Alert {
    fn error(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: "Error".into(),
            message: message.into(),
            severity: Some(severity),
        }
    }

    fn success(message: impl Into<String>) -> Self {
        Self {
            title: "Success".into(),
            message: message.into(),
            severity: None,
        }
    }
}

/// Everything the printer screen renders.
#[derive(Debug, Clone)]
pub struct PrinterScreenState {
    /// Printer MAC address as typed.
    pub address: String,
    /// Label text handed to the bridge.
    pub payload: String,
    /// Result of the last successful discovery pass, in discovery order.
    pub printers: Vec<DiscoveredPrinter>,
    pub discovering: bool,
    pub alert: Option<Alert>,
}

impl PrinterScreenState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            address: String::new(),
            payload: config.default_payload.clone(),
            printers: Vec::new(),
            discovering: false,
            alert: None,
        }
    }

    pub fn discover_label(&self) -> &'static str {
        if self.discovering {
            "Discovering..."
        } else {
            "Discover Printers"
        }
    }

    pub fn begin_discovery(&mut self) {
        self.discovering = true;
    }

    /// Apply the single result of a discovery pass.
    ///
    /// The list is only replaced on success; a failed pass keeps the
    /// previous results on screen.
    pub fn finish_discovery(&mut self, outcome: DiscoveryOutcome) {
        self.discovering = false;
        let alert = match outcome.map(|json| parse_printers(&json)) {
            Ok(Ok(printers)) => {
                let found = printers.len();
                self.printers = printers;
                Alert::success(format!("Found {found} printer(s)"))
            }
            Ok(Err(e)) => Alert::error(
                format!("Printer Discovery Failed: {e}"),
                humanize_error(&e).severity,
            ),
            Err(human) => Alert::error(format!("Printer Discovery Failed: {human}"), human.severity),
        };
        self.alert = Some(alert);
    }

    /// Validate the address and hand the job to `write`.
    ///
    /// `write` is not called when the address is blank. Otherwise the success
    /// alert is shown straight away; the write reports nothing back.
    pub fn send_print_job(&mut self, write: impl FnOnce(String, String)) {
        let address = self.address.trim();
        if address.is_empty() {
            self.alert = Some(Alert::error(
                "Please enter a MAC address.",
                Severity::ActionRequired,
            ));
            return;
        }
        write(address.to_string(), self.payload.clone());
        self.alert = Some(Alert::success("Print job sent."));
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelwerk_core::LabelwerkError;

    fn state() -> PrinterScreenState {
        PrinterScreenState::new(&AppConfig::default())
    }

    #[test]
    fn starts_with_hello_world_payload() {
        let state = state();
        assert_eq!(state.payload, "^XA^FO50,50^A0N,50,50^FDHello World^FS^XZ");
        assert!(state.printers.is_empty());
        assert_eq!(state.discover_label(), "Discover Printers");
    }

    #[test]
    fn discovery_flag_drives_button_label() {
        let mut state = state();
        state.begin_discovery();
        assert_eq!(state.discover_label(), "Discovering...");
        state.finish_discovery(Ok("[]".into()));
        assert_eq!(state.discover_label(), "Discover Printers");
    }

    #[test]
    fn successful_discovery_replaces_list_and_counts() {
        let mut state = state();
        state.begin_discovery();
        state.finish_discovery(Ok(
            r#"[{"address":"AC:3F:A4:00:00:01","friendlyName":"ZQ520"},{"address":"AC:3F:A4:00:00:02"}]"#
                .into(),
        ));

        assert!(!state.discovering);
        assert_eq!(
            state.printers,
            vec![
                DiscoveredPrinter::new("AC:3F:A4:00:00:01", Some("ZQ520".into())),
                DiscoveredPrinter::new("AC:3F:A4:00:00:02", None),
            ]
        );
        assert_eq!(state.printers[1].friendly_name, "Unknown");
        assert_eq!(state.alert, Some(Alert::success("Found 2 printer(s)")));
    }

    #[test]
    fn failed_discovery_alerts_and_keeps_list() {
        let mut state = state();
        state.printers = vec![DiscoveredPrinter::new("AC:3F:A4:00:00:01", None)];
        state.begin_discovery();
        let human = humanize_error(&LabelwerkError::Discovery("adapter is not powered".into()));
        state.finish_discovery(Err(human));

        assert!(!state.discovering);
        assert_eq!(state.printers.len(), 1);
        assert_eq!(
            state.alert,
            Some(Alert::error(
                "Printer Discovery Failed: Bluetooth is not available. Switch Bluetooth on, then search again.",
                Severity::ActionRequired,
            ))
        );
    }

    #[test]
    fn malformed_discovery_json_is_an_error_alert() {
        let mut state = state();
        state.finish_discovery(Ok("not json".into()));
        let alert = state.alert.unwrap();
        assert_eq!(alert.title, "Error");
        assert!(alert.message.starts_with("Printer Discovery Failed: serialization error"));
        assert!(alert.severity.is_some());
    }

    #[test]
    fn empty_address_does_not_write() {
        let mut state = state();
        let mut called = false;
        state.send_print_job(|_, _| called = true);
        assert!(!called);
        assert_eq!(
            state.alert,
            Some(Alert::error("Please enter a MAC address.", Severity::ActionRequired))
        );

        state.address = "   ".into();
        state.send_print_job(|_, _| called = true);
        assert!(!called);
    }

    #[test]
    fn send_writes_and_always_reports_success() {
        let mut state = state();
        state.address = " AC:3F:A4:00:00:01 ".into();
        let mut sent = None;
        state.send_print_job(|address, payload| sent = Some((address, payload)));

        assert_eq!(
            sent,
            Some((
                "AC:3F:A4:00:00:01".to_string(),
                "^XA^FO50,50^A0N,50,50^FDHello World^FS^XZ".to_string()
            ))
        );
        assert_eq!(state.alert, Some(Alert::success("Print job sent.")));
        assert!(state.alert.unwrap().severity.is_none());
    }

    #[test]
    fn dismiss_clears_alert() {
        let mut state = state();
        state.send_print_job(|_, _| {});
        state.dismiss_alert();
        assert!(state.alert.is_none());
    }
}
