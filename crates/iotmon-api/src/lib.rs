// iotmon-api: Async Rust client for the device-monitoring REST API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{DeviceClient, Endpoint};
pub use error::Error;
pub use models::{NewReading, ReadingResponse};
pub use transport::TransportConfig;
