// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use color_eyre::Result;
use color_eyre::eyre::Context;
use parking_lottery_audit::AuditEvent;
use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::info;

pub async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Failed to read {}", path.display()))
}

/// Pretty JSON to `path`, or to stdout.
pub async fn write_json<T: Serialize + Sync>(path: Option<&Path>, value: &T) -> Result<()> {
    let mut json: String = serde_json::to_string_pretty(value)?;
    json.push('\n');

    match path {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote session");
        }
        None => print!("{json}"),
    }
    Ok(())
}

/// Logs the event and, when a log file is configured, appends it as one JSON
/// line.
pub async fn append_audit(path: Option<&Path>, event: &AuditEvent) -> Result<()> {
    info!(
        action = %event.action.name,
        details = event.action.details.as_deref().unwrap_or_default(),
        actor = %event.actor.id,
        "Audit event"
    );

    let Some(path) = path else {
        return Ok(());
    };
    let mut line: String = serde_json::to_string(event)?;
    line.push('\n');

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .wrap_err_with(|| format!("Failed to open audit log {}", path.display()))?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}
