//! Reactive data layer between `iotmon-api` and presentation consumers.
//!
//! This crate owns the client-side synchronization logic for the device
//! monitor:
//!
//! - **[`DeviceStore`]** — the in-memory list of readings with its
//!   loading/error flags. [`fetch()`](DeviceStore::fetch) replaces the list
//!   wholesale, [`add()`](DeviceStore::add) and
//!   [`delete()`](DeviceStore::delete) patch it after the backend confirms.
//!   Every change is published as an immutable snapshot over a
//!   `tokio::sync::watch` channel.
//!
//! - **[`RefreshScheduler`]** — a one-second countdown that triggers a
//!   refresh when it runs out, plus a manual trigger. Both feed the same
//!   refresh action; the task stops when its [`RefreshHandle`] is dropped.
//!
//! - **[`selection`]** — pure reconciliation of the selected device id
//!   against the current list, and first-occurrence deduplication.
//!
//! - **[`Monitor`]** — facade wiring the three together the way the
//!   dashboard uses them.

pub mod chart;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod monitor;
pub mod refresh;
pub mod selection;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use chart::{ChartPoint, Summary};
pub use config::{MonitorConfig, TlsVerification};
pub use error::CoreError;
pub use iotmon_api::{Endpoint, Error as ApiError};
pub use model::{DeviceReading, DeviceRef, ReadingDraft};
pub use monitor::{Monitor, MonitorHandle};
pub use refresh::{Countdown, RefreshHandle, RefreshScheduler, SchedulerState};
pub use selection::{reconcile, unique_devices};
pub use store::{DeviceListState, DeviceStore};
pub use stream::StateStream;
