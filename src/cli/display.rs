//! Display utilities for the Pomodoro TUI.
//!
//! This module provides formatted output for:
//! - The live status line
//! - Settings
//! - Error messages

use std::io::{self, Write};

use crate::config::{ConfigError, Settings};
use crate::types::{format_time, SessionInfo};

/// Width of the progress bar in characters.
const PROGRESS_BAR_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for terminal output.
pub struct Display;

impl Display {
    /// Formats the one-line status summary.
    ///
    /// ```text
    /// FOCUS TIME  12:34  [########------------]  session 2/4  today 5
    /// ```
    pub fn status_line(info: &SessionInfo) -> String {
        format!(
            "{:<11} {}  [{}]  session {}/{}  today {}",
            info.state.display_name(),
            format_time(info.remaining_seconds),
            Self::progress_bar(info.progress, PROGRESS_BAR_WIDTH),
            info.current_pomodoro,
            info.pomodoros_until_long_break,
            info.completed_today,
        )
    }

    /// Redraws the status line in place.
    pub fn show_status(info: &SessionInfo) {
        let mut stdout = io::stdout().lock();
        // Trailing spaces clear leftovers from a longer previous line.
        let _ = write!(stdout, "\r{}   ", Self::status_line(info));
        let _ = stdout.flush();
    }

    /// Renders `progress` in `[0.0, 1.0]` as a bar of `width` cells.
    fn progress_bar(progress: f64, width: usize) -> String {
        let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
        format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
    }

    /// Prints a message on its own line, below the status line.
    pub fn show_message(message: &str) {
        println!("\r{}", message);
    }

    /// Prints settings in the file format.
    pub fn show_settings(settings: &Settings, json: bool) -> anyhow::Result<()> {
        let text = if json {
            serde_json::to_string_pretty(settings)?
        } else {
            toml::to_string_pretty(settings)?
        };
        println!("{}", text.trim_end());
        Ok(())
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Shows an error with a hint when the cause is a settings problem.
    pub fn show_anyhow_error(err: &anyhow::Error) {
        Self::show_error(&format!("{:#}", err));
        if let Some(config_err) = err.downcast_ref::<ConfigError>() {
            eprintln!("hint: {}", config_err.suggestion());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
