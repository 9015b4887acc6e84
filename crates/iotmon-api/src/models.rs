// Wire types for the device endpoints.
//
// The backend speaks camelCase JSON. Extra bookkeeping fields it attaches
// (`_id`, `__v`, ...) are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reading as returned by `GET /api/devices/*` and `POST /api/devices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingResponse {
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    pub temperature: f64,
    pub humidity: f64,
    pub timestamp: DateTime<Utc>,
}

/// Request body for `POST /api/devices`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    pub device_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    pub temperature: f64,
    pub humidity: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reading_ignores_backend_bookkeeping_fields() {
        let raw = json!({
            "_id": "6650c0ffee",
            "deviceId": "DEV1",
            "deviceName": "Greenhouse",
            "temperature": 21.5,
            "humidity": 48.0,
            "timestamp": "2024-06-15T10:30:00Z",
            "__v": 0
        });
        let reading: ReadingResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(reading.device_id, "DEV1");
        assert_eq!(reading.device_name.as_deref(), Some("Greenhouse"));
    }

    #[test]
    fn reading_without_name_deserializes() {
        let raw = json!({
            "deviceId": "DEV2",
            "temperature": 19.0,
            "humidity": 60.0,
            "timestamp": "2024-06-15T10:30:00.000Z"
        });
        let reading: ReadingResponse = serde_json::from_value(raw).unwrap();
        assert!(reading.device_name.is_none());
    }

    #[test]
    fn new_reading_omits_missing_name() {
        let body = NewReading {
            device_id: "DEV5".into(),
            device_name: None,
            temperature: 20.0,
            humidity: 50.0,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({ "deviceId": "DEV5", "temperature": 20.0, "humidity": 50.0 })
        );
    }
}
