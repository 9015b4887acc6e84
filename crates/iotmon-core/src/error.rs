// ── Core error types ──
//
// The three remote failures display the fixed, user-facing message for
// their operation. The transport-level cause stays reachable through
// `source()` for logs and `-v` output.

use thiserror::Error;

use crate::Endpoint;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote operation errors ──────────────────────────────────────
    #[error("Failed to fetch device data")]
    FetchFailed {
        endpoint: Endpoint,
        #[source]
        source: iotmon_api::Error,
    },

    #[error("Failed to add device data")]
    WriteFailed {
        device_id: String,
        #[source]
        source: iotmon_api::Error,
    },

    #[error("Failed to delete device")]
    DeleteFailed {
        device_id: String,
        #[source]
        source: iotmon_api::Error,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to build HTTP client")]
    Client(#[source] iotmon_api::Error),
}

impl CoreError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// The underlying API error, for remote failures.
    pub fn api_error(&self) -> Option<&iotmon_api::Error> {
        match self {
            Self::FetchFailed { source, .. }
            | Self::WriteFailed { source, .. }
            | Self::DeleteFailed { source, .. }
            | Self::Client(source) => Some(source),
            Self::Validation { .. } | Self::Config { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    fn api() -> iotmon_api::Error {
        iotmon_api::Error::Api {
            status: 503,
            message: "down".into(),
        }
    }

    #[test]
    fn remote_messages_are_fixed() {
        let fetch = CoreError::FetchFailed {
            endpoint: Endpoint::Latest,
            source: api(),
        };
        let write = CoreError::WriteFailed {
            device_id: "DEV1".into(),
            source: api(),
        };
        let delete = CoreError::DeleteFailed {
            device_id: "DEV1".into(),
            source: api(),
        };
        assert_eq!(fetch.to_string(), "Failed to fetch device data");
        assert_eq!(write.to_string(), "Failed to add device data");
        assert_eq!(delete.to_string(), "Failed to delete device");
    }

    #[test]
    fn source_is_preserved() {
        let err = CoreError::FetchFailed {
            endpoint: Endpoint::History,
            source: api(),
        };
        assert!(err.source().is_some());
        assert_eq!(err.api_error().and_then(iotmon_api::Error::status), Some(503));
    }

    #[test]
    fn validation_has_no_api_error() {
        let err = CoreError::validation("device_id", "Device ID is required");
        assert!(err.api_error().is_none());
    }
}
