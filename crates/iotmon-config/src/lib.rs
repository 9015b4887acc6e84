//! Configuration for the iotmon CLI.
//!
//! A flat TOML file at the platform config directory, layered over
//! built-in defaults and under `IOTMON_*` environment variables, then
//! translated into `iotmon_core::MonitorConfig`. CLI flags are applied on
//! top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use iotmon_core::config::DEFAULT_API_URL;
use iotmon_core::{MonitorConfig, TlsVerification};

/// Prefix for environment overrides, e.g. `IOTMON_API_URL`.
pub const ENV_PREFIX: &str = "IOTMON_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Backend base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between automatic refreshes in `watch`.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Default output format: table, json, json-compact, yaml, plain.
    #[serde(default = "default_output")]
    pub output: String,

    /// Color mode: auto, always, never.
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
            insecure: false,
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    60
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// Keys accepted by [`Config::set`] and [`Config::get`].
pub const KEYS: &[&str] = &[
    "api_url",
    "timeout",
    "refresh_interval",
    "insecure",
    "output",
    "color",
];

impl Config {
    /// Read one key as a display string.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        Ok(match key {
            "api_url" => self.api_url.clone(),
            "timeout" => self.timeout.to_string(),
            "refresh_interval" => self.refresh_interval.to_string(),
            "insecure" => self.insecure.to_string(),
            "output" => self.output.clone(),
            "color" => self.color.clone(),
            other => return Err(ConfigError::UnknownKey(other.into())),
        })
    }

    /// Set one key from its string form. The new value is validated.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "api_url" => value.clone_into(&mut self.api_url),
            "timeout" => self.timeout = parse_secs("timeout", value)?,
            "refresh_interval" => self.refresh_interval = parse_secs("refresh_interval", value)?,
            "insecure" => {
                self.insecure = value.parse().map_err(|_| ConfigError::Validation {
                    field: "insecure".into(),
                    reason: format!("expected true or false, got '{value}'"),
                })?;
            }
            "output" => value.clone_into(&mut self.output),
            "color" => value.clone_into(&mut self.color),
            other => return Err(ConfigError::UnknownKey(other.into())),
        }
        self.validate()
    }

    /// Reject values no command could run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url: url::Url = self.api_url.parse().map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", self.api_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "api_url".into(),
                reason: format!("expected http or https, got '{}'", url.scheme()),
            });
        }
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.refresh_interval == 0 {
            return Err(ConfigError::Validation {
                field: "refresh_interval".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if !matches!(
            self.output.as_str(),
            "table" | "json" | "json-compact" | "yaml" | "plain"
        ) {
            return Err(ConfigError::Validation {
                field: "output".into(),
                reason: format!("unknown format '{}'", self.output),
            });
        }
        if !matches!(self.color.as_str(), "auto" | "always" | "never") {
            return Err(ConfigError::Validation {
                field: "color".into(),
                reason: format!("expected auto, always or never, got '{}'", self.color),
            });
        }
        Ok(())
    }

    /// Translate into the runtime monitor configuration.
    pub fn to_monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        self.validate()?;
        let api_url: url::Url = self.api_url.parse().map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", self.api_url),
        })?;

        Ok(MonitorConfig {
            api_url,
            tls: if self.insecure {
                TlsVerification::DangerAcceptInvalid
            } else {
                TlsVerification::SystemDefaults
            },
            timeout: Duration::from_secs(self.timeout),
            refresh_interval: Duration::from_secs(self.refresh_interval),
            ..MonitorConfig::default()
        })
    }
}

fn parse_secs(field: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("expected a whole number of seconds, got '{value}'"),
    })
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "iotmon", "iotmon").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("iotmon");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path`, then `IOTMON_*` variables.
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
}

/// Load the config from `path` alone, ignoring the environment. Used when
/// the file is about to be rewritten.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()?;
    Ok(config)
}

/// Load the config from `path` plus the environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    Ok(config)
}

/// Load the config from the canonical path plus the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, returning the defaults if anything goes wrong.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}
