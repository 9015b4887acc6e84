// ── Chart and summary derivation ──
//
// Read-only views over a device list for the selected device: the series
// fed to the temperature/humidity chart, and the latest-reading summary
// with its change since the previous reading.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

use crate::model::DeviceReading;

/// Placeholder for a value that is not available.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a device without a name.
pub const NAME_NOT_SET: &str = "Not Set";

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One point of the chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// `HH:MM` in the rendering time zone.
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
}

/// Chart series for `device_id`, labelled in local time.
///
/// Takes the first `limit` readings of the device (the newest, since the
/// list is newest first) and returns them oldest first.
pub fn series(items: &[DeviceReading], device_id: &str, limit: usize) -> Vec<ChartPoint> {
    series_in(items, device_id, limit, &Local)
}

/// [`series`] with labels rendered in `tz`.
pub fn series_in<Tz: TimeZone>(
    items: &[DeviceReading],
    device_id: &str,
    limit: usize,
    tz: &Tz,
) -> Vec<ChartPoint>
where
    Tz::Offset: std::fmt::Display,
{
    let mut points: Vec<ChartPoint> = items
        .iter()
        .filter(|r| r.device_id == device_id)
        .take(limit)
        .map(|r| ChartPoint {
            label: r.timestamp.with_timezone(tz).format("%H:%M").to_string(),
            timestamp: r.timestamp,
            temperature: round1(r.temperature),
            humidity: round1(r.humidity),
        })
        .collect();
    points.reverse();
    points
}

/// Latest reading of a device and how it moved since the one before.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub device_id: String,
    pub device_name: Option<String>,
    pub temperature: f64,
    pub humidity: f64,
    /// Change versus the previous reading, 0 when there is none.
    pub temperature_change: f64,
    pub humidity_change: f64,
    pub timestamp: DateTime<Utc>,
}

impl Summary {
    pub fn name_or_placeholder(&self) -> &str {
        self.device_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(NAME_NOT_SET)
    }
}

/// Summary for `device_id`, or `None` if the list has no reading for it.
pub fn summary(items: &[DeviceReading], device_id: &str) -> Option<Summary> {
    let mut readings = items.iter().filter(|r| r.device_id == device_id);
    let latest = readings.next()?;
    let previous = readings.next().unwrap_or(latest);

    Some(Summary {
        device_id: latest.device_id.clone(),
        device_name: latest.device_name.clone(),
        temperature: round1(latest.temperature),
        humidity: round1(latest.humidity),
        temperature_change: round1(latest.temperature - previous.temperature),
        humidity_change: round1(latest.humidity - previous.humidity),
        timestamp: latest.timestamp,
    })
}
