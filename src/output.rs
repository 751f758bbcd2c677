//! # Output Configuration
//!
//! Controls how human-facing summaries look: emoji markers and color when
//! the terminal supports them, plain bracketed markers otherwise. Progress
//! during a run goes through `log`; this module only shapes the final
//! summary that a command prints to stdout.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forkpatch::output::{OutputConfig, summarize_outcome};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! for line in summarize_outcome(&config, &outcome, false) {
//!     println!("{line}");
//! }
//! ```

use console::style;
use std::env;

use crate::apply::{ApplyOutcome, FailureReason};

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always" forces colors on
    /// (overriding `NO_COLOR`), "never" forces them off, anything else
    /// detects support from the environment and the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns `emoji_str` when colors are enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Renders the end-of-run summary of an apply outcome.
///
/// The first line carries the counts. Every failed patch follows on its own
/// line, in listed order, so a user can fix them one by one.
pub fn summarize_outcome(config: &OutputConfig, outcome: &ApplyOutcome, dry_run: bool) -> Vec<String> {
    let (ok_word, fail_word) = if dry_run {
        ("would apply", "would fail")
    } else {
        ("applied", "failed")
    };

    let mut lines = Vec::with_capacity(outcome.failed.len() + 1);
    if outcome.is_success() {
        lines.push(format!(
            "{} {}/{} patches {}",
            emoji(config, "✅", "[OK]"),
            outcome.applied.len(),
            outcome.total(),
            ok_word
        ));
        return lines;
    }

    lines.push(format!(
        "{} {} {}, {} {}",
        emoji(config, "❌", "[FAIL]"),
        outcome.applied.len(),
        ok_word,
        outcome.failed.len(),
        fail_word
    ));
    for failure in &outcome.failed {
        let note = match &failure.reason {
            FailureReason::Missing => " (patch file not found)",
            FailureReason::Rejected { .. } => "",
        };
        let path = if config.use_color {
            style(&failure.relative).red().to_string()
        } else {
            failure.relative.clone()
        };
        lines.push(format!("   - {}{}", path, note));
    }
    lines
}
