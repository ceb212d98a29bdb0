// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer management screen.
//
// Address and label inputs, "Discover Printers" / "Send Print Job" buttons and
// the list from the last discovery pass. Bluetooth permissions are requested
// once when the screen mounts; nothing waits on the answer.

use dioxus::prelude::*;

use crate::pages::alert::AlertModal;
use crate::services::app_services::AppServices;
use crate::state::PrinterScreenState;

const LABEL_STYLE: &str = "display: block; font-size: 16px; margin-bottom: 5px; color: #555;";
const INPUT_STYLE: &str = "width: 100%; padding: 10px; margin-bottom: 15px; font-size: 16px; border: 1px solid #ccc; border-radius: 8px; background: #fff; box-sizing: border-box;";
const BUTTON_STYLE: &str = "flex: 1; padding: 15px; margin: 0 5px; border: none; border-radius: 8px; color: #fff; font-size: 16px; font-weight: bold;";

#[component]
pub fn PrinterScreen() -> Element {
    let svc = use_context::<AppServices>();
    let mut state = use_signal(|| PrinterScreenState::new(svc.config()));

    {
        let svc = svc.clone();
        use_hook(move || svc.request_bluetooth_permissions());
    }

    let snapshot = state.read().clone();
    let discover_label = snapshot.discover_label();

    rsx! {
        div { style: "max-width: 600px; margin: 0 auto;",
            h1 { style: "font-size: 24px; font-weight: bold; margin-bottom: 20px; color: red;",
                "Printer Management"
            }

            label { style: LABEL_STYLE, "Printer MAC Address:" }
            input {
                r#type: "text",
                placeholder: "Enter MAC Address",
                value: "{snapshot.address}",
                style: INPUT_STYLE,
                oninput: move |evt| state.write().address = evt.value(),
            }

            label { style: LABEL_STYLE, "ZPL Data:" }
            textarea {
                placeholder: "Enter ZPL",
                value: "{snapshot.payload}",
                style: "{INPUT_STYLE} height: 100px; font-family: monospace;",
                oninput: move |evt| state.write().payload = evt.value(),
            }

            div { style: "display: flex; justify-content: space-between; margin-bottom: 20px;",
                button {
                    style: "{BUTTON_STYLE} background: #007bff;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            state.write().begin_discovery();
                            let svc = svc.clone();
                            spawn(async move {
                                let outcome = svc.discover().await;
                                state.write().finish_discovery(outcome);
                            });
                        }
                    },
                    "{discover_label}"
                }
                button {
                    style: "{BUTTON_STYLE} background: #28a745;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            state.write().send_print_job(|address, payload| svc.write(address, payload));
                        }
                    },
                    "Send Print Job"
                }
            }

            label { style: LABEL_STYLE, "Discovered Printers:" }
            if snapshot.printers.is_empty() {
                p { style: "text-align: center; font-size: 16px; margin-top: 20px;",
                    "No printers discovered yet."
                }
            } else {
                for (i, printer) in snapshot.printers.iter().enumerate() {
                    div {
                        key: "{printer.address}-{i}",
                        style: "padding: 15px; margin-bottom: 10px; background: #fff; border: 1px solid #ccc; border-radius: 8px;",
                        div { style: "font-size: 16px; font-weight: bold; color: #333;", "{printer.friendly_name}" }
                        div { style: "font-size: 14px;", "{printer.address}" }
                    }
                }
            }

            if let Some(alert) = snapshot.alert.clone() {
                AlertModal {
                    title: alert.title,
                    message: alert.message,
                    severity: alert.severity,
                    on_close: move |_| state.write().dismiss_alert(),
                }
            }
        }
    }
}
