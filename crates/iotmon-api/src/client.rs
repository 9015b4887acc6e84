// Async HTTP client for the device-monitoring REST API.
//
// Base path: /api/devices
// Auth: none (the backend is assumed to sit behind its own access control)

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{NewReading, ReadingResponse};
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── Read endpoints ───────────────────────────────────────────────────

/// Which read view to pull from the backend.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Endpoint {
    /// One reading per device, the most recent.
    #[default]
    Latest,
    /// Every stored reading, newest first.
    History,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the device endpoints.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DeviceClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the given transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let url = Url::parse(raw.trim())?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(Error::UnsupportedScheme(raw.to_owned()));
        }
        Ok(url)
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `normalize_base_url` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(ErrorResponse {
                message: Some(m), ..
            })
            | Ok(ErrorResponse {
                message: None,
                error: Some(m),
            }) => m,
            _ if raw.is_empty() => status.to_string(),
            _ => raw,
        };

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `GET /api/devices/latest` or `GET /api/devices/history`.
    pub async fn list(&self, endpoint: Endpoint) -> Result<Vec<ReadingResponse>, Error> {
        let view: &'static str = endpoint.into();
        let url = self.url(&["api", "devices", view]);
        self.get(url).await
    }

    /// `POST /api/devices` — store a reading, creating the device if needed.
    ///
    /// Returns the canonical reading as persisted by the backend.
    pub async fn create_reading(&self, body: &NewReading) -> Result<ReadingResponse, Error> {
        let url = self.url(&["api", "devices"]);
        debug!(device_id = %body.device_id, "creating reading");
        self.post(url, body).await
    }

    /// `DELETE /api/devices/{deviceId}` — remove a device and its history.
    pub async fn delete_device(&self, device_id: &str) -> Result<(), Error> {
        let url = self.url(&["api", "devices", device_id]);
        debug!(device_id, "deleting device");
        self.delete(url).await
    }
}
