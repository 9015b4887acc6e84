//! Config subcommand handlers.

use dialoguer::Input;

use iotmon_config::{Config, load_config_file};
use iotmon_core::config::DEFAULT_API_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, KEYS};
use crate::error::CliError;
use crate::{output, style};

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}

/// The file's own contents, so environment overrides are not written back.
fn load_file() -> Result<Config, CliError> {
    Ok(load_config_file(&config::config_path())?)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::resolve(global)?;
            let settings = config::settings(global, &cfg);
            let out = output::render_single(
                settings.format,
                &cfg,
                format_config,
                |c| c.api_url.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Get { key } => {
            let cfg = config::resolve(global)?;
            output::print_output(&cfg.get(&key)?, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = load_file()?;
            cfg.set(&key, &value)?;
            config::save_config(&cfg)?;

            let settings = config::settings(global, &cfg);
            let msg = format!("{key} = {value}");
            output::print_output(&style::format_success(&msg, settings.color), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = load_file()?;

    let api_url: String = Input::new()
        .with_prompt("Backend URL")
        .default(global.api_url.clone().unwrap_or_else(|| {
            if cfg.api_url.is_empty() {
                DEFAULT_API_URL.into()
            } else {
                cfg.api_url.clone()
            }
        }))
        .validate_with(|input: &String| -> Result<(), String> {
            let mut probe = Config::default();
            probe.set("api_url", input).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;
    cfg.set("api_url", &api_url)?;

    let interval: String = Input::new()
        .with_prompt("Refresh interval (seconds)")
        .default(cfg.refresh_interval.to_string())
        .interact_text()
        .map_err(prompt_err)?;
    cfg.set("refresh_interval", &interval)?;

    config::save_config(&cfg)?;

    let settings = config::settings(global, &cfg);
    let msg = format!("Wrote {}", config::config_path().display());
    output::print_output(&style::format_success(&msg, settings.color), global.quiet);
    eprintln!("Keys: {}", KEYS.join(", "));
    Ok(())
}
