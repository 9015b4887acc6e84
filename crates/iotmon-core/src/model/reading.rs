// ── Reading domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped temperature/humidity sample from a device.
///
/// A list of readings may contain several entries per `device_id` (history
/// view); list order is recency order, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceReading {
    pub device_id: String,
    pub device_name: Option<String>,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    pub timestamp: DateTime<Utc>,
}

impl DeviceReading {
    /// The name to show for this device, falling back to its id.
    pub fn display_name(&self) -> &str {
        self.device_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.device_id)
    }
}
