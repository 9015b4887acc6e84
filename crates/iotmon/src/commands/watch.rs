//! Live dashboard: keeps the device list fresh and prints each update.

use std::io::{self, IsTerminal};
use std::time::Duration;

use chrono::{Local, Utc};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use iotmon_core::chart::{self, Summary};
use iotmon_core::{
    DeviceListState, Endpoint, Monitor, MonitorConfig, SchedulerState, unique_devices,
};

use crate::cli::{OutputFormat, WatchArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::{output, style};

use super::devices::summary_lines;

/// One update, for structured output formats.
#[derive(Serialize)]
struct Update<'a> {
    devices: usize,
    selected: &'a str,
    summary: Option<Summary>,
    error: Option<&'a str>,
    next_refresh_secs: u64,
    refreshing: bool,
    data_age_secs: Option<i64>,
}

/// "updated 12s ago · ", or nothing before the first successful fetch.
fn data_age_label(state: &DeviceListState) -> String {
    state
        .data_age(Utc::now())
        .map_or_else(String::new, |age| {
            format!("updated {}s ago · ", age.num_seconds().max(0))
        })
}

pub async fn handle(
    args: WatchArgs,
    mut config: MonitorConfig,
    settings: &Settings,
) -> Result<(), CliError> {
    if let Some(secs) = args.interval {
        if secs == 0 {
            return Err(CliError::Validation {
                field: "interval".into(),
                reason: "must be greater than zero".into(),
            });
        }
        config.refresh_interval = Duration::from_secs(secs);
    }
    if args.latest {
        config.refresh_endpoint = Endpoint::Latest;
    }

    let monitor = Monitor::new(config)?;
    let mut states = monitor.store().subscribe();
    let handle = monitor.start();

    let interactive = io::stdin().is_terminal();
    if interactive && !settings.quiet {
        eprintln!("Press Enter to refresh now, q + Enter to quit.");
    }
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = interactive;
    let mut updates = 0_usize;

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break,
            state = states.changed() => {
                let Some(state) = state else { break };
                let current = monitor.selection();
                let preferred = args.device.as_deref().unwrap_or(&current);
                let selected = monitor.select(preferred);

                let out = render_update(&state, &selected, handle.scheduler_state(), settings)?;
                output::print_output(&out, settings.quiet);

                updates += 1;
                if args.count.is_some_and(|n| updates >= n) {
                    break;
                }
            }
            line = stdin.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().eq_ignore_ascii_case("q") => break,
                Ok(Some(_)) => {
                    handle.refresh_now();
                }
                Ok(None) | Err(_) => stdin_open = false,
            },
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn render_update(
    state: &DeviceListState,
    selected: &str,
    scheduler: SchedulerState,
    settings: &Settings,
) -> Result<String, CliError> {
    let summary = chart::summary(&state.items, selected);
    let devices = unique_devices(&state.items).len();

    match settings.format {
        OutputFormat::Table => {
            let next = if scheduler.refreshing {
                "refreshing…".to_owned()
            } else {
                format!("next refresh in {}s", scheduler.remaining.as_secs())
            };
            let header = format!(
                "── {} · {} device{} · {}{} ──",
                Local::now().format("%H:%M:%S"),
                devices,
                if devices == 1 { "" } else { "s" },
                data_age_label(state),
                next
            );
            let mut lines = vec![style::format_title(&header, settings.color)];
            if state.is_empty() {
                lines.push("No devices found.".into());
            } else {
                lines.extend(summary_lines(summary.as_ref(), settings.color));
            }
            if let Some(ref err) = state.error {
                lines.push(style::format_error(err, settings.color));
            }
            Ok(lines.join("\n"))
        }
        OutputFormat::Plain => Ok(summary.map_or_else(String::new, |s| {
            format!("{}\t{:.1}\t{:.1}", s.device_id, s.temperature, s.humidity)
        })),
        format => {
            let update = Update {
                devices,
                selected,
                summary,
                error: state.error.as_deref(),
                next_refresh_secs: scheduler.remaining.as_secs(),
                refreshing: scheduler.refreshing,
                data_age_secs: state.data_age(Utc::now()).map(|age| age.num_seconds()),
            };
            // Streamed updates are always one line each.
            let format = if format == OutputFormat::Json {
                OutputFormat::JsonCompact
            } else {
                format
            };
            output::render_single(format, &update, |_| String::new(), |_| String::new())
        }
    }
}
