// ── API-to-domain conversions ──

use iotmon_api::ReadingResponse;

use crate::model::DeviceReading;

impl From<ReadingResponse> for DeviceReading {
    fn from(r: ReadingResponse) -> Self {
        Self {
            device_id: r.device_id,
            device_name: r.device_name,
            temperature: r.temperature,
            humidity: r.humidity,
            timestamp: r.timestamp,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn fields_carry_over() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let reading = DeviceReading::from(ReadingResponse {
            device_id: "DEV3".into(),
            device_name: Some("Attic".into()),
            temperature: 19.25,
            humidity: 61.0,
            timestamp: ts,
        });
        assert_eq!(reading.device_id, "DEV3");
        assert_eq!(reading.display_name(), "Attic");
        assert!((reading.temperature - 19.25).abs() < f64::EPSILON);
        assert_eq!(reading.timestamp, ts);
    }
}
