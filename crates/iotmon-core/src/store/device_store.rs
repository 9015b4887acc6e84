// ── Device store ──
//
// Owns the device list and publishes it as immutable snapshots. Remote
// calls happen outside the channel; each result is applied in one
// `send_modify`, so whichever response resolves last wins.

use std::sync::Arc;

use chrono::Utc;
use iotmon_api::DeviceClient;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::DeviceListState;
use crate::error::CoreError;
use crate::model::{DeviceReading, ReadingDraft};
use crate::stream::StateStream;
use crate::Endpoint;

/// In-memory device list backed by the remote API.
pub struct DeviceStore {
    client: DeviceClient,
    state: watch::Sender<Arc<DeviceListState>>,
}

impl DeviceStore {
    pub fn new(client: DeviceClient) -> Self {
        let (state, _) = watch::channel(Arc::new(DeviceListState::default()));
        Self { client, state }
    }

    // ── Snapshots ────────────────────────────────────────────────────

    /// The current state.
    pub fn snapshot(&self) -> Arc<DeviceListState> {
        self.state.borrow().clone()
    }

    /// Subscribe to every future state change.
    pub fn subscribe(&self) -> StateStream<Arc<DeviceListState>> {
        StateStream::new(self.state.subscribe())
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch `endpoint` and replace the list with the result.
    ///
    /// On failure the list is left as it was and `error` is set to the
    /// fetch message. `loading` is cleared either way.
    pub async fn fetch(&self, endpoint: Endpoint) -> Result<(), CoreError> {
        debug!(%endpoint, "fetching device data");
        let result = self.client.list(endpoint).await;

        match result {
            Ok(readings) => {
                let items: Vec<DeviceReading> =
                    readings.into_iter().map(DeviceReading::from).collect();
                debug!(%endpoint, count = items.len(), "device data fetched");
                self.state.send_modify(|s| {
                    let s = Arc::make_mut(s);
                    s.replace_items(items, Utc::now());
                    s.settle();
                });
                Ok(())
            }
            Err(source) => {
                let err = CoreError::FetchFailed { endpoint, source };
                warn!(
                    %endpoint,
                    error = %err,
                    status = ?err.api_error().and_then(iotmon_api::Error::status),
                    cause = ?err.api_error(),
                    "fetch failed"
                );
                self.state.send_modify(|s| {
                    let s = Arc::make_mut(s);
                    s.fail(err.to_string());
                    s.settle();
                });
                Err(err)
            }
        }
    }

    /// Raise `loading`, then fetch.
    pub async fn load(&self, endpoint: Endpoint) -> Result<(), CoreError> {
        self.state.send_if_modified(|s| {
            if s.loading {
                return false;
            }
            Arc::make_mut(s).loading = true;
            true
        });
        self.fetch(endpoint).await
    }

    /// Validate `draft`, submit it, and put the created reading first.
    ///
    /// Validation failures are returned without touching the store.
    pub async fn add(&self, draft: &ReadingDraft) -> Result<DeviceReading, CoreError> {
        let body = draft.validate()?;
        debug!(device_id = %body.device_id, "adding reading");

        match self.client.create_reading(&body).await {
            Ok(created) => {
                let reading = DeviceReading::from(created);
                self.state.send_modify(|s| {
                    Arc::make_mut(s).apply_created(&body.device_id, reading.clone());
                });
                Ok(reading)
            }
            Err(source) => {
                let err = CoreError::WriteFailed {
                    device_id: body.device_id,
                    source,
                };
                warn!(
                    error = %err,
                    status = ?err.api_error().and_then(iotmon_api::Error::status),
                    cause = ?err.api_error(),
                    "add failed"
                );
                self.state.send_modify(|s| Arc::make_mut(s).fail(err.to_string()));
                Err(err)
            }
        }
    }

    /// Delete `device_id` remotely, then drop all its readings locally.
    pub async fn delete(&self, device_id: &str) -> Result<(), CoreError> {
        debug!(device_id, "deleting device");

        match self.client.delete_device(device_id).await {
            Ok(()) => {
                self.state.send_modify(|s| {
                    let removed = Arc::make_mut(s).apply_deleted(device_id);
                    debug!(device_id, removed, "device removed from list");
                });
                Ok(())
            }
            Err(source) => {
                let err = CoreError::DeleteFailed {
                    device_id: device_id.to_owned(),
                    source,
                };
                warn!(
                    error = %err,
                    status = ?err.api_error().and_then(iotmon_api::Error::status),
                    cause = ?err.api_error(),
                    "delete failed"
                );
                self.state.send_modify(|s| Arc::make_mut(s).fail(err.to_string()));
                Err(err)
            }
        }
    }
}
