//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod util;
pub mod watch;

use iotmon_core::MonitorConfig;

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: MonitorConfig,
    settings: &Settings,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(args, config, settings).await,
        Command::Watch(args) => watch::handle(args, config, settings).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
