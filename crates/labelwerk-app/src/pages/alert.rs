// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Modal alert with a single OK button. Errors get an accent bar coloured by
// severity.

use dioxus::prelude::*;

use labelwerk_core::human_errors::Severity;

fn accent_colour(severity: Option<Severity>) -> &'static str {
    match severity {
        None => "#28a745",
        Some(Severity::Transient) => "#f0ad4e",
        Some(Severity::ActionRequired) => "#007bff",
        Some(Severity::Permanent) => "#dc3545",
    }
}

#[component]
pub fn AlertModal(
    title: String,
    message: String,
    severity: Option<Severity>,
    on_close: EventHandler,
) -> Element {
    let accent = accent_colour(severity);

    rsx! {
        div {
            style: "position: fixed; inset: 0; background: rgba(0,0,0,0.4); display: flex; align-items: center; justify-content: center;",
            div {
                style: "background: white; border-radius: 12px; border-left: 6px solid {accent}; padding: 20px; min-width: 260px; max-width: 80%; box-shadow: 0 4px 16px rgba(0,0,0,0.2);",
                h2 { style: "margin: 0 0 8px 0; font-size: 18px; color: {accent};", "{title}" }
                p { style: "margin: 0 0 16px 0; font-size: 16px; color: #333;", "{message}" }
                button {
                    style: "float: right; padding: 8px 20px; border: none; border-radius: 8px; background: #007bff; color: white; font-size: 16px; font-weight: bold;",
                    onclick: move |_| on_close.call(()),
                    "OK"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_severity_has_its_own_accent() {
        let colours = [
            accent_colour(None),
            accent_colour(Some(Severity::Transient)),
            accent_colour(Some(Severity::ActionRequired)),
            accent_colour(Some(Severity::Permanent)),
        ];
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
