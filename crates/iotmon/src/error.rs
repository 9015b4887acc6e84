//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use iotmon_config::ConfigError;
use iotmon_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the backend at {url}")]
    #[diagnostic(
        code(iotmon::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Set the URL with --api-url, IOTMON_API_URL, or: iotmon config set api_url <URL>"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: CoreError,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(iotmon::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout {
        #[source]
        source: CoreError,
    },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Device '{device_id}' not found")]
    #[diagnostic(
        code(iotmon::not_found),
        help("Run: iotmon devices latest to see available devices")
    )]
    NotFound {
        device_id: String,
        #[source]
        source: Option<CoreError>,
    },

    // ── Remote ───────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(iotmon::remote), help("Re-run with -v for request details."))]
    Remote(CoreError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(iotmon::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(iotmon::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(iotmon::config),
        help("Inspect the configuration with: iotmon config show")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(iotmon::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Config(ConfigError::Validation { .. } | ConfigError::UnknownKey(_)) => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { field, message } => CliError::Validation {
                field: field.replace('_', "-"),
                reason: message,
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            other => {
                let Some(api) = other.api_error() else {
                    return CliError::Remote(other);
                };
                if api.is_timeout() {
                    return CliError::Timeout { source: other };
                }
                if api.is_connect() {
                    let url = match api {
                        iotmon_core::ApiError::Transport(e) => e.url().map(|u| u.origin()),
                        _ => None,
                    }
                    .map_or_else(
                        || "the configured URL".into(),
                        |origin| origin.ascii_serialization(),
                    );
                    return CliError::ConnectionFailed { url, source: other };
                }
                if api.is_not_found() {
                    if let CoreError::DeleteFailed { device_id, .. } = &other {
                        return CliError::NotFound {
                            device_id: device_id.clone(),
                            source: Some(other),
                        };
                    }
                }
                CliError::Remote(other)
            }
        }
    }
}
