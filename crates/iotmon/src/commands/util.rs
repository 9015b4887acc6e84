//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use iotmon_core::{DeviceListState, Endpoint, Monitor, MonitorConfig};

use crate::config::Settings;
use crate::error::CliError;
use crate::style;

/// Fetch one list view with a spinner on stderr.
pub async fn fetch_list(
    config: MonitorConfig,
    endpoint: Endpoint,
    settings: &Settings,
) -> Result<Arc<DeviceListState>, CliError> {
    let spinner = style::operation_spinner("Fetching device data...", settings.quiet);

    let result = Monitor::oneshot(config, |monitor| async move {
        monitor.store().fetch(endpoint).await?;
        Ok(monitor.snapshot())
    })
    .await;

    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }
    Ok(result?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

/// Local wall-clock rendering of a reading timestamp.
pub fn local_time(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
