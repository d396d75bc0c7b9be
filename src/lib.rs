//! Pomodoro TUI Library
//!
//! This library provides the core functionality for the Pomodoro TUI.
//! It includes:
//! - Timer engine with a background countdown and event listeners
//! - Type definitions for phases, configuration and timer state
//! - TOML-backed user settings
//! - CLI command parsing, display utilities and console listeners

pub mod cli;
pub mod config;
pub mod engine;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{ConfigError, Settings, SettingsProvider, SettingsStore};
pub use engine::{Callback, Timer, WeakTimer};
pub use types::{
    DurationUpdate, EventKind, Phase, SessionInfo, TimerConfig, TimerEvent, TimerState,
};
