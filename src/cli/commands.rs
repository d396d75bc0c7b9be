//! Command definitions for the Pomodoro TUI.
//!
//! Uses clap derive macro for argument parsing. Interactive key commands
//! read from stdin while the timer runs are parsed here as well.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

use crate::types::DurationUpdate;

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro TUI - an aesthetic terminal Pomodoro timer
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-tui",
    version,
    about = "An aesthetic terminal Pomodoro timer",
    long_about = "Focus in 25-minute work sessions separated by short breaks, \
                  with a long break after every full cycle.\n\
                  Runs in the foreground and takes single-letter commands on stdin.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of ~/.pomodoro-tui/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the timer in this terminal
    Run(RunArgs),

    /// Show or change saved settings
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Per-run overrides; saved settings are left untouched.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Work duration in minutes (1-120)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub work: Option<u32>,

    /// Short break duration in minutes (1-120)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub short_break: Option<u32>,

    /// Long break duration in minutes (1-120)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub long_break: Option<u32>,

    /// Work sessions before a long break (1-12)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub cycle: Option<u32>,

    /// Disable the completion bell
    #[arg(long)]
    pub no_sound: bool,
}

impl RunArgs {
    /// Collects the duration overrides given on the command line.
    pub fn duration_update(&self) -> DurationUpdate {
        DurationUpdate {
            work_minutes: self.work,
            short_break_minutes: self.short_break,
            long_break_minutes: self.long_break,
            pomodoros_until_long_break: self.cycle,
        }
    }
}

// ============================================================================
// Config Subcommands
// ============================================================================

/// Settings management
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the saved settings
    Show {
        /// Print as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Restore the default settings
    Reset,

    /// Validate and save new settings
    Set(SetArgs),
}

/// New values for `config set`; omitted values are kept.
#[derive(Args, Debug, Clone, Default)]
pub struct SetArgs {
    /// Work duration in minutes (15-45)
    #[arg(long)]
    pub work: Option<u32>,

    /// Short break duration in minutes (3-10)
    #[arg(long)]
    pub short_break: Option<u32>,

    /// Long break duration in minutes (10-30)
    #[arg(long)]
    pub long_break: Option<u32>,

    /// Work sessions before a long break (2-6)
    #[arg(long)]
    pub cycle: Option<u32>,

    /// Turn the completion bell on or off
    #[arg(long, value_name = "BOOL")]
    pub sound: Option<bool>,
}

impl SetArgs {
    pub fn duration_update(&self) -> DurationUpdate {
        DurationUpdate {
            work_minutes: self.work,
            short_break_minutes: self.short_break,
            long_break_minutes: self.long_break,
            pomodoros_until_long_break: self.cycle,
        }
    }
}

// ============================================================================
// Interactive Key Commands
// ============================================================================

/// Commands typed on stdin while the timer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// `s`: start a work session
    Start,
    /// `p`: pause, or resume if paused
    TogglePause,
    /// `k`: skip to the end of the current interval
    Skip,
    /// `x`: stop and return to idle
    Stop,
    /// `r`: reset the completed-today counter
    ResetStats,
    /// `?` or `h`: show key help
    Help,
    /// `q`: quit
    Quit,
}

impl KeyCommand {
    /// Key help shown at startup and on `?`.
    pub const HELP: &'static str =
        "[s] start  [p] pause/resume  [k] skip  [x] stop  [r] reset today  [q] quit";

    /// Verb used when reporting that the command was not accepted.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::TogglePause => "pause or resume",
            Self::Skip => "skip",
            Self::Stop => "stop",
            Self::ResetStats => "reset",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

impl FromStr for KeyCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "start" => Ok(Self::Start),
            "p" | "pause" | "resume" => Ok(Self::TogglePause),
            "k" | "skip" => Ok(Self::Skip),
            "x" | "stop" => Ok(Self::Stop),
            "r" | "reset" => Ok(Self::ResetStats),
            "?" | "h" | "help" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{}'", other)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
