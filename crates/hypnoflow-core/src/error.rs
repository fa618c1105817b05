//! Core error types for hypnoflow-core.
//!
//! Audio failures are ordinary values here: the session converts them into
//! user notices and never lets them escape the exercise-start path.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hypnoflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Audio subsystem errors
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/config directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors for exercise definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Exercise has no phases
    #[error("Exercise '{0}' has no phases")]
    NoPhases(String),

    /// A phase has zero duration
    #[error("Phase '{label}' must have a positive duration")]
    ZeroDuration { label: String },

    /// Tick period is zero
    #[error("Tick period must be positive")]
    ZeroTick,

    /// Bounded exercise with a zero total
    #[error("Bounded exercise total must be positive")]
    ZeroTotal,

    /// Malformed `#RRGGBB` color
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
}

/// Audio errors. Both kinds are recovered locally.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioError {
    /// The audio resource cannot be loaded (not bundled, unreadable).
    #[error("Audio asset '{asset}' could not be loaded: {message}")]
    MissingAsset { asset: String, message: String },

    /// The platform audio session cannot be configured.
    #[error("Audio playback could not be configured: {message}")]
    PlaybackConfiguration { message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
