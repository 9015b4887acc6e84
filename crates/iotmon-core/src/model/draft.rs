// ── Reading drafts ──
//
// What the operator typed, before validation. Validation happens locally
// and never reaches the network or the store's error slot.

use iotmon_api::NewReading;

use crate::error::CoreError;

/// Prefix the backend expects on ids of newly registered devices.
pub const DEVICE_ID_PREFIX: &str = "DEV";

/// Which device a new reading belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceRef {
    /// Register a new device. Holds the numeric part only; the
    /// [`DEVICE_ID_PREFIX`] is added on submit.
    New(String),
    /// Add a reading to a device that already exists, by full id.
    Existing(String),
}

/// A reading as entered by the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingDraft {
    pub device: DeviceRef,
    pub device_name: Option<String>,
    pub temperature: f64,
    pub humidity: f64,
}

impl ReadingDraft {
    /// Draft a reading for a new device with numeric id `digits`.
    pub fn new_device(digits: impl Into<String>, temperature: f64, humidity: f64) -> Self {
        Self {
            device: DeviceRef::New(digits.into()),
            device_name: None,
            temperature,
            humidity,
        }
    }

    /// Draft a reading for the existing device `device_id`.
    pub fn existing(device_id: impl Into<String>, temperature: f64, humidity: f64) -> Self {
        Self {
            device: DeviceRef::Existing(device_id.into()),
            device_name: None,
            temperature,
            humidity,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    /// The full device id this draft will be submitted under.
    pub fn device_id(&self) -> String {
        match &self.device {
            DeviceRef::New(digits) => format!("{DEVICE_ID_PREFIX}{digits}"),
            DeviceRef::Existing(id) => id.trim().to_owned(),
        }
    }

    /// Check the draft and build the request body.
    pub fn validate(&self) -> Result<NewReading, CoreError> {
        match &self.device {
            DeviceRef::New(digits) => {
                if digits.is_empty() {
                    return Err(CoreError::validation("device_id", "Device ID is required"));
                }
                if !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(CoreError::validation(
                        "device_id",
                        "Device ID must contain only numbers",
                    ));
                }
            }
            DeviceRef::Existing(id) => {
                if id.trim().is_empty() {
                    return Err(CoreError::validation("device_id", "Device ID is required"));
                }
            }
        }

        if !self.temperature.is_finite() {
            return Err(CoreError::validation(
                "temperature",
                "Temperature must be a number",
            ));
        }
        if !self.humidity.is_finite() {
            return Err(CoreError::validation("humidity", "Humidity must be a number"));
        }

        let device_name = self
            .device_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned);

        Ok(NewReading {
            device_id: self.device_id(),
            device_name,
            temperature: self.temperature,
            humidity: self.humidity,
        })
    }
}
