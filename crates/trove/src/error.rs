//! Settings errors.
//!
//! Unset variables are never an error: they resolve to an empty string or
//! `false`. Only the override file and explicit duration parsing can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or interpreting settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The override file exists but could not be read or parsed
    #[error("Failed to load override file {path:?}: {source}")]
    OverrideFile {
        path: Option<PathBuf>,
        #[source]
        source: dotenvy::Error,
    },

    /// A duration setting holds a value that does not parse
    #[error("Invalid duration for {name}: {value:?} ({source})")]
    InvalidDuration {
        name: String,
        value: String,
        #[source]
        source: DurationError,
    },
}

impl SettingsError {
    /// Create an override file error
    pub fn override_file(path: Option<PathBuf>, source: dotenvy::Error) -> Self {
        SettingsError::OverrideFile { path, source }
    }

    /// Create an invalid duration error
    pub fn invalid_duration(
        name: impl Into<String>,
        value: impl Into<String>,
        source: DurationError,
    ) -> Self {
        SettingsError::InvalidDuration {
            name: name.into(),
            value: value.into(),
            source,
        }
    }
}

/// Reasons a duration string is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,

    #[error("invalid duration syntax")]
    InvalidSyntax,

    #[error("missing unit in duration")]
    MissingUnit,

    #[error("unknown unit {0:?} in duration")]
    UnknownUnit(String),

    #[error("duration out of range")]
    Overflow,

    #[error("no day count in duration")]
    MissingDayCount,
}

/// Result type alias for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;
