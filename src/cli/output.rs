//! Terminal output for CLI handlers.
//!
//! Every helper honours the global [`OutputConfig`]: in JSON mode each call
//! emits one `{"type", "payload"}` line instead of styled text, and quiet
//! mode drops everything except warnings, errors, hot alerts and command
//! results.

use std::fmt::Display;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde_json::{json, Value};

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn current() -> OutputConfig {
    *OUTPUT.get_or_init(RwLock::default).read()
}

/// Whether a message survives `--quiet`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Level {
    Regular,
    Always,
}

/// Emit one message: a JSON line in JSON mode, `human` otherwise.
fn emit(kind: &str, level: Level, payload: impl FnOnce() -> Value, human: impl FnOnce()) {
    let config = current();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": payload() }));
    } else if level == Level::Always || !config.quiet {
        human();
    }
}

/// Apply output settings from the global CLI flags.
pub fn configure(config: OutputConfig) {
    *OUTPUT.get_or_init(RwLock::default).write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

pub fn header(version: &str) {
    emit(
        "header",
        Level::Regular,
        || json!({ "app": "surebet", "version": version }),
        || println!("{} {}", "surebet".bold(), version.dimmed()),
    );
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        Level::Regular,
        || json!({ "label": label, "value": value }),
        || println!("  {:<14} {}", label.dimmed(), value),
    );
}

pub fn success(message: &str) {
    emit(
        "success",
        Level::Regular,
        || json!({ "message": message }),
        || println!("  {} {}", "✓".green(), message),
    );
}

pub fn warning(message: &str) {
    emit(
        "warning",
        Level::Always,
        || json!({ "message": message }),
        || println!("  {} {}", "⚠".yellow(), message),
    );
}

/// Print an error to stderr, in either mode.
pub fn error(message: &str) {
    if current().json {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

pub fn section(title: &str) {
    emit(
        "section",
        Level::Regular,
        || json!({ "title": title }),
        || println!("\n{}", title.bold()),
    );
}

pub fn note(message: &str) {
    emit(
        "note",
        Level::Regular,
        || json!({ "message": message }),
        || println!("  {}", message.dimmed()),
    );
}

pub fn hint(message: &str) {
    emit(
        "hint",
        Level::Regular,
        || json!({ "message": message }),
        || println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed()),
    );
}

/// One hot opportunity, printed while `run` is scanning.
pub fn hot(timestamp: &str, message: &str) {
    emit(
        "hot",
        Level::Always,
        || json!({ "timestamp": timestamp, "message": message }),
        || println!("  {} {} {}", timestamp.dimmed(), "hot".bold().yellow(), message),
    );
}

/// Print pre-rendered text such as a table, indented.
pub fn lines(content: &str) {
    emit(
        "lines",
        Level::Regular,
        || json!({ "content": content }),
        || {
            for line in content.lines() {
                println!("  {line}");
            }
        },
    );
}

/// Emit a command result as a single JSON document.
pub fn json_output(value: Value) {
    println!("{value}");
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Start a spinner. Hidden in JSON or quiet mode.
pub fn spinner(message: &str) -> ProgressBar {
    let config = current();
    let pb = if config.json || config.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(SPINNER_FRAMES)
                .template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };
    pb.set_message(message.to_string());
    pb
}

pub fn spinner_success(pb: &ProgressBar, message: &str) {
    if pb.is_hidden() {
        pb.finish_and_clear();
    } else {
        pb.finish_with_message(format!("{} {}", "✓".green(), message));
    }
}

pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    if pb.is_hidden() {
        pb.finish_and_clear();
    } else {
        pb.finish_with_message(format!("{} {}", "×".red(), message));
    }
}

fn styled(value: impl Display, style: impl FnOnce(&str) -> String) -> String {
    let value = value.to_string();
    if is_json() {
        value
    } else {
        style(&value)
    }
}

pub fn positive(value: impl Display) -> String {
    styled(value, |v| v.green().to_string())
}

pub fn negative(value: impl Display) -> String {
    styled(value, |v| v.red().to_string())
}

pub fn highlight(value: impl Display) -> String {
    styled(value, |v| v.cyan().to_string())
}

/// Bold yellow, for opportunities over the alert threshold.
pub fn flame(value: impl Display) -> String {
    styled(value, |v| v.bold().yellow().to_string())
}

pub fn muted(value: impl Display) -> String {
    styled(value, |v| v.dimmed().to_string())
}
