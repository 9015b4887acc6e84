// ── Device list snapshot ──
//
// Pure state transitions. `DeviceStore` applies them inside a single
// `send_modify`, so every published snapshot is one complete transition.

use chrono::{DateTime, Utc};

use crate::model::DeviceReading;

/// The device list plus its loading/error flags.
///
/// `items` is in recency order, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceListState {
    pub items: Vec<DeviceReading>,
    /// True until the first fetch settles, and during an explicit load.
    pub loading: bool,
    /// Message from the most recent failed operation.
    pub error: Option<String>,
    /// When `items` was last replaced by a successful fetch.
    pub last_fetch: Option<DateTime<Utc>>,
}

impl Default for DeviceListState {
    /// Empty and loading: nothing has been fetched yet.
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
            last_fetch: None,
        }
    }
}

impl DeviceListState {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Readings belonging to `device_id`, in list order.
    pub fn readings_for<'a>(
        &'a self,
        device_id: &'a str,
    ) -> impl Iterator<Item = &'a DeviceReading> + 'a {
        self.items.iter().filter(move |r| r.device_id == device_id)
    }

    /// How long ago the last successful fetch landed.
    pub fn data_age(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.last_fetch.map(|at| now - at)
    }

    // ── Transitions ──────────────────────────────────────────────────

    pub(crate) fn replace_items(&mut self, items: Vec<DeviceReading>, at: DateTime<Utc>) {
        self.items = items;
        self.error = None;
        self.last_fetch = Some(at);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.error = Some(message);
    }

    pub(crate) fn settle(&mut self) {
        self.loading = false;
    }

    /// Put `reading` first and drop every other entry for the device.
    ///
    /// Entries under the submitted id go too, in case the backend
    /// answered with a different canonical id.
    pub(crate) fn apply_created(&mut self, requested_id: &str, reading: DeviceReading) {
        self.items
            .retain(|r| r.device_id != requested_id && r.device_id != reading.device_id);
        self.items.insert(0, reading);
        self.error = None;
    }

    /// Drop every entry for `device_id`. Returns how many were removed.
    pub(crate) fn apply_deleted(&mut self, device_id: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|r| r.device_id != device_id);
        self.error = None;
        before - self.items.len()
    }
}
