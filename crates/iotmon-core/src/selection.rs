//! Selected-device reconciliation.
//!
//! Both functions are pure. [`reconcile`] runs after every change to the
//! device list so the selection is always empty or a device that is
//! actually present.

use std::collections::HashSet;

use crate::model::DeviceReading;

/// The selection to use for `items`, given the previous selection `current`.
///
/// - no items: `""`
/// - `current` empty or no longer present: the first item's device id
/// - otherwise `current`, unchanged
pub fn reconcile(items: &[DeviceReading], current: &str) -> String {
    let Some(first) = items.first() else {
        return String::new();
    };
    if !current.is_empty() && items.iter().any(|r| r.device_id == current) {
        return current.to_owned();
    }
    first.device_id.clone()
}

/// One reading per device id, keeping the first occurrence, in list order.
///
/// With a newest-first list this is the latest reading of each device.
pub fn unique_devices(items: &[DeviceReading]) -> Vec<&DeviceReading> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|r| seen.insert(r.device_id.as_str()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn reading(id: &str, temperature: f64) -> DeviceReading {
        DeviceReading {
            device_id: id.into(),
            device_name: None,
            temperature,
            humidity: 40.0,
            timestamp: Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<DeviceReading> {
        vec![
            reading("DEV1", 21.0),
            reading("DEV2", 18.0),
            reading("DEV1", 20.0),
            reading("DEV3", 25.0),
            reading("DEV2", 17.0),
        ]
    }

    #[test]
    fn unique_keeps_first_occurrence_in_order() {
        let items = sample();
        let unique = unique_devices(&items);
        let ids: Vec<&str> = unique.iter().map(|r| r.device_id.as_str()).collect();
        assert_eq!(ids, vec!["DEV1", "DEV2", "DEV3"]);
        assert!((unique[0].temperature - 21.0).abs() < f64::EPSILON);
        assert!((unique[1].temperature - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unique_of_empty_is_empty() {
        assert!(unique_devices(&[]).is_empty());
    }

    #[test]
    fn reconcile_empty_list_clears_selection() {
        assert_eq!(reconcile(&[], "DEV1"), "");
        assert_eq!(reconcile(&[], ""), "");
    }

    #[test]
    fn reconcile_falls_back_to_first() {
        let items = sample();
        assert_eq!(reconcile(&items, ""), "DEV1");
        assert_eq!(reconcile(&items, "DEV9"), "DEV1");
    }

    #[test]
    fn reconcile_keeps_present_selection() {
        let items = sample();
        assert_eq!(reconcile(&items, "DEV3"), "DEV3");
    }

    #[test]
    fn reconcile_is_idempotent() {
        let items = sample();
        for current in ["", "DEV2", "DEV9"] {
            let once = reconcile(&items, current);
            assert_eq!(reconcile(&items, &once), once);
        }
    }

    #[test]
    fn reconcile_result_is_present_or_empty() {
        let items = sample();
        for current in ["", "DEV1", "DEV2", "DEV3", "DEV4", "dev1"] {
            let selected = reconcile(&items, current);
            assert!(items.iter().any(|r| r.device_id == selected));
        }
    }
}
