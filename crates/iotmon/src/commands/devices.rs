//! Device command handlers.

use serde::Serialize;
use tabled::Tabled;

use iotmon_core::chart::{self, ChartPoint, NOT_AVAILABLE, Summary};
use iotmon_core::{
    DeviceReading, Endpoint, Monitor, MonitorConfig, ReadingDraft, reconcile, unique_devices,
};

use crate::cli::{AddArgs, DevicesArgs, DevicesCommand, OutputFormat};
use crate::config::Settings;
use crate::error::CliError;
use crate::{output, style};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Device")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Temperature")]
    temperature: String,
    #[tabled(rename = "Humidity")]
    humidity: String,
    #[tabled(rename = "Recorded")]
    recorded: String,
}

impl ReadingRow {
    fn new(r: &DeviceReading, color: bool) -> Self {
        Self {
            id: r.device_id.clone(),
            name: r.device_name.clone().unwrap_or_default(),
            temperature: style::format_temp(r.temperature, color),
            humidity: style::format_humidity(r.humidity, color),
            recorded: util::local_time(r.timestamp),
        }
    }
}

#[derive(Tabled)]
struct PointRow {
    #[tabled(rename = "Time")]
    label: String,
    #[tabled(rename = "Temperature")]
    temperature: String,
    #[tabled(rename = "Humidity")]
    humidity: String,
}

// ── Detail views ────────────────────────────────────────────────────

/// `devices show` payload for structured output formats.
#[derive(Serialize)]
struct DeviceView {
    summary: Option<Summary>,
    series: Vec<ChartPoint>,
}

pub(crate) fn summary_lines(summary: Option<&Summary>, color: bool) -> Vec<String> {
    let Some(s) = summary else {
        return vec![
            format!("Temperature: {NOT_AVAILABLE}"),
            format!("Humidity:    {NOT_AVAILABLE}"),
            format!("Device ID:   {NOT_AVAILABLE}"),
            format!("Device Name: {}", chart::NAME_NOT_SET),
        ];
    };
    vec![
        format!(
            "Temperature: {}  ({})",
            style::format_temp(s.temperature, color),
            style::format_change(s.temperature_change, "°C", color)
        ),
        format!(
            "Humidity:    {}  ({})",
            style::format_humidity(s.humidity, color),
            style::format_change(s.humidity_change, "%", color)
        ),
        format!("Device ID:   {}", s.device_id),
        format!("Device Name: {}", s.name_or_placeholder()),
        format!("Recorded:    {}", util::local_time(s.timestamp)),
    ]
}

fn view_detail(view: &DeviceView, color: bool) -> String {
    let title = view.summary.as_ref().map_or_else(
        || "No readings".to_owned(),
        |s| format!("{} ({})", s.name_or_placeholder(), s.device_id),
    );
    let mut lines = vec![style::format_title(&title, color)];
    lines.extend(summary_lines(view.summary.as_ref(), color));

    if !view.series.is_empty() {
        let rows: Vec<PointRow> = view
            .series
            .iter()
            .map(|p| PointRow {
                label: p.label.clone(),
                temperature: format!("{:.1}", p.temperature),
                humidity: format!("{:.1}", p.humidity),
            })
            .collect();
        lines.push(String::new());
        lines.push(output::render_table(&rows));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: DevicesArgs,
    config: MonitorConfig,
    settings: &Settings,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::Latest => {
            let state = util::fetch_list(config, Endpoint::Latest, settings).await?;
            let latest: Vec<&DeviceReading> = unique_devices(&state.items);
            let out = output::render_list(
                settings.format,
                &latest,
                |r| ReadingRow::new(r, settings.color),
                |r| r.device_id.clone(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        DevicesCommand::History { device, limit } => {
            let state = util::fetch_list(config, Endpoint::History, settings).await?;
            let limit = limit.unwrap_or(usize::MAX);
            let readings: Vec<&DeviceReading> = match device.as_deref() {
                Some(id) => state.readings_for(id).take(limit).collect(),
                None => state.items.iter().take(limit).collect(),
            };
            let out = output::render_list(
                settings.format,
                &readings,
                |r| ReadingRow::new(r, settings.color),
                |r| format!("{}\t{}", r.device_id, r.timestamp.to_rfc3339()),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        DevicesCommand::Show { device } => {
            let series_limit = config.series_limit;
            let state = util::fetch_list(config, Endpoint::History, settings).await?;

            if let Some(ref wanted) = device {
                if !state.items.iter().any(|r| &r.device_id == wanted) {
                    return Err(CliError::NotFound {
                        device_id: wanted.clone(),
                        source: None,
                    });
                }
            }
            let selected = reconcile(&state.items, device.as_deref().unwrap_or_default());
            let view = DeviceView {
                summary: chart::summary(&state.items, &selected),
                series: chart::series(&state.items, &selected, series_limit),
            };

            let out = output::render_single(
                settings.format,
                &view,
                |v| view_detail(v, settings.color),
                |v| {
                    v.summary
                        .as_ref()
                        .map_or_else(String::new, |s| s.device_id.clone())
                },
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        DevicesCommand::Add(add) => handle_add(add, config, settings).await,

        DevicesCommand::Delete { device_id } => {
            let prompt = format!("Delete device {device_id} and all of its readings?");
            if !util::confirm(&prompt, "devices delete", settings.yes)? {
                output::print_output("Aborted.", settings.quiet);
                return Ok(());
            }

            let spinner = style::operation_spinner("Deleting device...", settings.quiet);
            let id = device_id.clone();
            let result = Monitor::oneshot(config, |monitor| async move {
                monitor.store().delete(&id).await
            })
            .await;
            if let Some(sp) = spinner {
                sp.finish_and_clear();
            }
            result?;

            if settings.format == OutputFormat::Table {
                let msg = format!("Deleted {device_id}");
                output::print_output(&style::format_success(&msg, settings.color), settings.quiet);
            }
            Ok(())
        }
    }
}

async fn handle_add(
    args: AddArgs,
    config: MonitorConfig,
    settings: &Settings,
) -> Result<(), CliError> {
    let mut draft = match (args.new_id, args.device) {
        (Some(digits), _) => ReadingDraft::new_device(digits, args.temperature, args.humidity),
        (None, device) => {
            ReadingDraft::existing(device.unwrap_or_default(), args.temperature, args.humidity)
        }
    };
    if let Some(name) = args.name {
        draft = draft.with_name(name);
    }

    // Fail on bad input before any spinner or network activity.
    draft.validate()?;

    let spinner = style::operation_spinner("Submitting reading...", settings.quiet);
    let result = Monitor::oneshot(config, |monitor| async move {
        monitor.store().add(&draft).await
    })
    .await;
    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }
    let created = result?;

    let out = output::render_single(
        settings.format,
        &created,
        |r| {
            let msg = format!(
                "Added reading for {}: {} / {}",
                r.display_name(),
                style::format_temp(r.temperature, settings.color),
                style::format_humidity(r.humidity, settings.color)
            );
            style::format_success(&msg, settings.color)
        },
        |r| r.device_id.clone(),
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}
