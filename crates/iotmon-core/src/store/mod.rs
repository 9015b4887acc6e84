// ── Device data store ──

mod device_store;
mod state;

pub use device_store::DeviceStore;
pub use state::DeviceListState;
