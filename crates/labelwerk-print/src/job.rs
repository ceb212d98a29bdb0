// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One print job over one connection.
//
// open -> detect language -> select payload -> write -> close
//
// The close step always runs once `open` has been attempted, whatever
// happened in between. A close failure is logged and never replaces the
// job's own result.

use std::time::Duration;

use tracing::{error, info, warn};

use labelwerk_core::error::Result;
use labelwerk_core::types::{PayloadMode, WriteOutcome};

use crate::connection::Connection;
use crate::labels::select_payload;
use crate::language::detect_language;

/// Parameters for a single job.
#[derive(Debug, Clone, Copy)]
pub struct JobOptions {
    pub mode: PayloadMode,
    pub language_timeout: Duration,
}

/// Run a job on `connection`, closing it before returning.
pub async fn send_job(
    connection: &mut dyn Connection,
    text: &str,
    options: JobOptions,
) -> Result<WriteOutcome> {
    let outcome = open_and_write(connection, text, options).await;

    if let Err(e) = connection.close().await {
        error!(address = connection.address(), error = %e, "error closing connection");
    }

    outcome
}

async fn open_and_write(
    connection: &mut dyn Connection,
    text: &str,
    options: JobOptions,
) -> Result<WriteOutcome> {
    connection.open().await?;

    if !connection.is_connected() {
        warn!(address = connection.address(), "connection did not come up");
        return Ok(WriteOutcome::NotConnected);
    }

    let language = detect_language(connection, options.language_timeout).await?;
    let payload = select_payload(options.mode, &language, text);

    if payload.is_empty() {
        info!(address = connection.address(), language = %language, "nothing to print for this language");
        return Ok(WriteOutcome::Skipped { language });
    }

    connection.write(payload).await?;
    info!(address = connection.address(), language = %language, bytes = payload.len(), "label written");

    Ok(WriteOutcome::Written {
        bytes: payload.len(),
        language,
    })
}
