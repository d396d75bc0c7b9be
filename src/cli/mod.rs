//! CLI module for the Pomodoro TUI.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive, plus stdin key commands
//! - `display`: Output formatting and display logic
//! - `listeners`: Timer listeners that draw to the terminal

pub mod commands;
pub mod display;
pub mod listeners;

pub use commands::{Cli, Commands, ConfigCommand, KeyCommand, RunArgs, SetArgs};
pub use display::Display;
