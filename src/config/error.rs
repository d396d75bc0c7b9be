//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while validating, loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A timer setting is outside the range offered to the user.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// The settings file could not be read or written.
    #[error("failed to access settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for this application.
    #[error("failed to parse settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The settings could not be encoded as TOML.
    #[error("failed to encode settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No home directory to place the default settings file in.
    #[error("could not determine the home directory")]
    NoHomeDirectory,
}

impl ConfigError {
    /// Returns true if this error came from validating user input.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// Returns true if this error concerns the settings file itself.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Parse { .. })
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "Run `pomodoro-tui config show` to see the current values",
            Self::Io { .. } => "Check the permissions of the settings directory",
            Self::Parse { .. } => "Fix the file or run `pomodoro-tui config reset`",
            Self::Serialize(_) => "Report this as a bug",
            Self::NoHomeDirectory => "Pass --config with an explicit settings path",
        }
    }
}
