// ── Domain model ──
//
// Canonical reading type plus the operator-facing draft that is validated
// before anything is sent to the backend.

mod draft;
mod reading;

pub use draft::{DEVICE_ID_PREFIX, DeviceRef, ReadingDraft};
pub use reading::DeviceReading;
