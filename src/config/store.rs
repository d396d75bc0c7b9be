//! File-backed settings store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{ConfigError, Settings, SettingsProvider};
use crate::types::{DurationUpdate, TimerConfig};

const SETTINGS_DIR: &str = ".pomodoro-tui";
const SETTINGS_FILE: &str = "config.toml";

/// Settings loaded from, and saved back to, a TOML file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Returns `~/.pomodoro-tui/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDirectory`] if the home directory is unknown.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(SETTINGS_DIR).join(SETTINGS_FILE))
            .ok_or(ConfigError::NoHomeDirectory)
    }

    /// Opens the settings file at the default location.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(Self::default_path()?)
    }

    /// Loads settings from `path`.
    ///
    /// A missing file is created with defaults. A file that cannot be read,
    /// parsed or validated is left alone and defaults are used for this run.
    ///
    /// # Errors
    ///
    /// Returns an error if the defaults cannot be written for a missing file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();

        if !path.exists() {
            debug!("Settings file {} not found, writing defaults", path.display());
            let store = Self {
                path,
                settings: Settings::default(),
            };
            store.save()?;
            return Ok(store);
        }

        let settings = load(&path).unwrap_or_else(|e| {
            warn!("{}; using default settings", e);
            Settings::default()
        });
        debug!("Loaded settings from {}", path.display());
        Ok(Self { path, settings })
    }

    /// Writes the current settings, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let text = toml::to_string_pretty(&self.settings)?;
        fs::write(&self.path, text).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Validates and persists new timer durations.
    ///
    /// Nothing is changed if validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for invalid values, or an I/O
    /// error if saving fails.
    pub fn update_timer(&mut self, update: &DurationUpdate) -> Result<TimerConfig, ConfigError> {
        let mut timer = self.settings.timer;
        update.apply_to(&mut timer);
        timer.validate()?;

        self.settings.timer = timer;
        self.save()?;
        Ok(timer)
    }

    /// Turns completion cues on or off and persists the change.
    pub fn set_audio_enabled(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.settings.audio.enabled = enabled;
        self.save()
    }

    /// Restores and persists the default settings.
    pub fn reset_to_defaults(&mut self) -> Result<(), ConfigError> {
        self.settings = Settings::default();
        self.save()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsProvider for SettingsStore {
    fn timer_config(&self) -> TimerConfig {
        self.settings.timer
    }

    fn audio_enabled(&self) -> bool {
        self.settings.audio.enabled
    }
}

fn load(path: &Path) -> Result<Settings, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: Settings = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    settings.validate()?;
    Ok(settings)
}
