// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Labelwerk — Bluetooth label printer console
//
// Entry point. Initialises logging and launches the Dioxus UI with the
// printer screen as its only page.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use pages::printer::PrinterScreen;
use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Labelwerk starting");

    dioxus::launch(app);
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(AppServices::init);
    use_context_provider(|| svc.clone());

    rsx! {
        div { class: "app-container",
            style: "min-height: 100vh; padding: 20px; background: white; font-family: system-ui, -apple-system, sans-serif; box-sizing: border-box;",
            PrinterScreen {}
        }
    }
}
