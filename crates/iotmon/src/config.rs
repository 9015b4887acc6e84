//! CLI configuration: thin wrapper around `iotmon_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --timeout, --insecure, --output, --color).

use clap::ValueEnum;

use iotmon_core::MonitorConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Re-exports from shared crate ────────────────────────────────────

pub use iotmon_config::{Config, KEYS, config_path, load_config, save_config};

// ── Resolved settings ───────────────────────────────────────────────

/// Presentation settings after flags, environment and file are merged.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
}

/// Load the config file and apply connection flag overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config()?;

    if let Some(ref url) = global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if global.insecure {
        cfg.insecure = true;
    }
    Ok(cfg)
}

/// Build the runtime monitor configuration from a resolved config.
pub fn monitor_config(cfg: &Config) -> Result<MonitorConfig, CliError> {
    Ok(cfg.to_monitor_config()?)
}

/// Output format and color: flag > env > config file > default.
pub fn settings(global: &GlobalOpts, cfg: &Config) -> Settings {
    let format = global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.output, true).ok())
        .unwrap_or(OutputFormat::Table);
    let color_mode = global
        .color
        .or_else(|| ColorMode::from_str(&cfg.color, true).ok())
        .unwrap_or(ColorMode::Auto);

    Settings {
        format,
        color: output::should_color(color_mode),
        quiet: global.quiet,
        yes: global.yes,
    }
}
