//! User settings.
//!
//! Settings live in a TOML file (by default `~/.pomodoro-tui/config.toml`):
//!
//! ```toml
//! [timer]
//! work_duration = 25
//! short_break_duration = 5
//! long_break_duration = 15
//! pomodoros_until_long_break = 4
//!
//! [audio]
//! enabled = true
//! ```
//!
//! Missing keys fall back to their defaults.

mod error;
mod store;

use serde::{Deserialize, Serialize};

use crate::types::TimerConfig;

pub use error::ConfigError;
pub use store::SettingsStore;

fn default_audio_enabled() -> bool {
    true
}

/// Audio cue settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Whether completion cues are played
    #[serde(default = "default_audio_enabled")]
    pub enabled: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: default_audio_enabled(),
        }
    }
}

/// Everything stored in the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timer: TimerConfig,
    pub audio: AudioSettings,
}

impl Settings {
    /// Validates the timer section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timer.validate()
    }
}

/// Read access to settings, whether held in memory or backed by a file.
pub trait SettingsProvider {
    /// Durations to construct or update a timer with.
    fn timer_config(&self) -> TimerConfig;

    /// Whether completion cues should be played.
    fn audio_enabled(&self) -> bool;
}

impl SettingsProvider for Settings {
    fn timer_config(&self) -> TimerConfig {
        self.timer
    }

    fn audio_enabled(&self) -> bool {
        self.audio.enabled
    }
}
