//! Terminal styling: spinners and colored values.

use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

const SPINNER_TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";
const SPINNER_TICK_MS: u64 = 80;

/// Below this the temperature renders cold (cyan).
const TEMP_COLD: f64 = 18.0;
/// Above this the temperature renders warm (orange).
const TEMP_WARM: f64 = 26.0;
/// Comfortable relative humidity band.
const HUMIDITY_LOW: f64 = 30.0;
const HUMIDITY_HIGH: f64 = 60.0;

// ── Spinners ─────────────────────────────────────────────────────────

/// Spinner on stderr while a request is out. `None` when stderr is not a
/// terminal or output is quiet.
pub fn operation_spinner(message: &str, quiet: bool) -> Option<ProgressBar> {
    if quiet || !io::stderr().is_terminal() {
        return None;
    }
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .ok()?
        .tick_chars(SPINNER_TICK_CHARS);
    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
    Some(pb)
}

// ── Values ───────────────────────────────────────────────────────────

pub fn format_temp(celsius: f64, color: bool) -> String {
    let formatted = format!("{celsius:.1}°C");
    if !color {
        return formatted;
    }
    if celsius < TEMP_COLD {
        formatted.cyan().to_string()
    } else if celsius > TEMP_WARM {
        formatted.truecolor(255, 165, 0).to_string()
    } else {
        formatted.green().to_string()
    }
}

pub fn format_humidity(percent: f64, color: bool) -> String {
    let formatted = format!("{percent:.1}%");
    if !color {
        return formatted;
    }
    if (HUMIDITY_LOW..=HUMIDITY_HIGH).contains(&percent) {
        formatted.green().to_string()
    } else {
        formatted.yellow().to_string()
    }
}

/// `+1.5 since last reading`, colored by direction.
pub fn format_change(change: f64, unit: &str, color: bool) -> String {
    let sign = if change > 0.0 { "+" } else { "" };
    let formatted = format!("{sign}{change:.1}{unit}");
    let text = if !color || change.abs() < f64::EPSILON {
        formatted
    } else if change > 0.0 {
        formatted.red().to_string()
    } else {
        formatted.blue().to_string()
    };
    format!("{text} since last reading")
}

// ── Messages ─────────────────────────────────────────────────────────

pub fn format_success(message: &str, color: bool) -> String {
    if color {
        format!("{} {message}", "[OK]".green())
    } else {
        format!("[OK] {message}")
    }
}

pub fn format_error(message: &str, color: bool) -> String {
    if color {
        format!("{} {message}", "[!!]".red())
    } else {
        format!("[!!] {message}")
    }
}

pub fn format_title(title: &str, color: bool) -> String {
    if color {
        title.bold().to_string()
    } else {
        title.to_owned()
    }
}
