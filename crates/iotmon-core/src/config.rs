// ── Runtime monitor configuration ──
//
// Describes *where* the backend lives and how often to poll it. Never
// touches disk: the CLI (via iotmon-config) builds a `MonitorConfig` and
// hands it in.

use std::time::Duration;

use iotmon_api::TransportConfig;
use iotmon_api::transport::TlsMode;
use url::Url;

use crate::error::CoreError;
use crate::Endpoint;

/// Backend URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5001";

/// Default polling interval.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Number of readings shown in the chart series.
pub const DEFAULT_SERIES_LIMIT: usize = 48;

/// TLS verification strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

impl From<TlsVerification> for TlsMode {
    fn from(tls: TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for monitoring a single backend.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Backend base URL (e.g. `http://localhost:5001`).
    pub api_url: Url,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Time between automatic refreshes.
    pub refresh_interval: Duration,
    /// Which list the scheduler keeps fresh.
    pub refresh_endpoint: Endpoint,
    /// How many readings the chart series keeps.
    pub series_limit: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            tls: TlsVerification::default(),
            timeout: TransportConfig::default().timeout,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            refresh_endpoint: Endpoint::History,
            series_limit: DEFAULT_SERIES_LIMIT,
        }
    }
}

impl MonitorConfig {
    /// Default config pointed at `api_url`.
    pub fn new(api_url: &str) -> Result<Self, CoreError> {
        let api_url = Url::parse(api_url).map_err(|e| CoreError::Config {
            message: format!("invalid API URL '{api_url}': {e}"),
        })?;
        Ok(Self {
            api_url,
            ..Self::default()
        })
    }

    /// Reject values the scheduler or client cannot work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.refresh_interval.is_zero() {
            return Err(CoreError::Config {
                message: "refresh interval must be greater than zero".into(),
            });
        }
        if self.timeout.is_zero() {
            return Err(CoreError::Config {
                message: "timeout must be greater than zero".into(),
            });
        }
        if !matches!(self.api_url.scheme(), "http" | "https") {
            return Err(CoreError::Config {
                message: format!("unsupported URL scheme '{}'", self.api_url.scheme()),
            });
        }
        Ok(())
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.into(),
            timeout: self.timeout,
        }
    }
}

#[allow(clippy::expect_used)]
fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL is valid")
}
