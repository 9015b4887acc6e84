//! Clap derive structures for the `iotmon` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// iotmon -- watch IoT temperature and humidity sensors from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "iotmon",
    version,
    about = "Monitor IoT temperature and humidity sensors",
    long_about = "Reads current and historical device readings from an iotmon backend,\n\
        registers devices and readings, and keeps a live dashboard refreshed\n\
        on a fixed interval.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL (overrides config)
    #[arg(long, short = 'u', env = "IOTMON_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "IOTMON_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, env = "IOTMON_COLOR", global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "IOTMON_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: from config, else 30]
    #[arg(long, env = "IOTMON_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, add and delete device readings
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Live dashboard: refresh on an interval and print each update
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// Latest reading of every device
    #[command(alias = "ls")]
    Latest,

    /// Stored readings, newest first
    History {
        /// Only readings of this device
        #[arg(long, short = 'd')]
        device: Option<String>,

        /// Show at most this many readings
        #[arg(long, short = 'l')]
        limit: Option<usize>,
    },

    /// Summary and recent series for one device
    Show {
        /// Device id [default: first device]
        device: Option<String>,
    },

    /// Submit a reading, registering the device if it is new
    Add(AddArgs),

    /// Delete a device and all of its readings
    #[command(alias = "rm")]
    Delete {
        /// Device id
        device_id: String,
    },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Register a new device with this numeric id (stored as DEV<id>)
    #[arg(
        long = "new",
        value_name = "DIGITS",
        conflicts_with = "device",
        required_unless_present = "device"
    )]
    pub new_id: Option<String>,

    /// Add the reading to an existing device
    #[arg(long, short = 'd')]
    pub device: Option<String>,

    /// Display name for the device
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Temperature in °C
    #[arg(long, short = 't', allow_negative_numbers = true)]
    pub temperature: f64,

    /// Relative humidity in percent
    #[arg(long, short = 'H')]
    pub humidity: f64,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refreshes [default: from config, else 60]
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Device to follow [default: first device]
    #[arg(long, short = 'd')]
    pub device: Option<String>,

    /// Poll the latest view instead of history
    #[arg(long)]
    pub latest: bool,

    /// Exit after this many updates
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file interactively
    Init,

    /// Display the resolved configuration
    Show,

    /// Print one configuration value
    Get {
        /// Config key (api_url, timeout, refresh_interval, insecure, output, color)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Config key (api_url, timeout, refresh_interval, insecure, output, color)
        key: String,

        /// Value to set
        value: String,
    },

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
