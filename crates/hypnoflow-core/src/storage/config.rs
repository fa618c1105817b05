//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Audio (enabled, asset root, volume)
//! - Display (instructions, output format)
//! - Bilateral run length
//!
//! Configuration is stored at `~/.config/hypnoflow/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError, ValidationError};
use crate::exercise::{ExerciseDefinition, ExerciseKind};

/// Audio configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Directory the logical asset paths are resolved against.
    /// Empty means the current directory.
    #[serde(default)]
    pub asset_dir: String,
    #[serde(default = "default_volume")]
    pub volume: f64,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_instructions: bool,
    /// Print events as JSON lines instead of text.
    #[serde(default)]
    pub json: bool,
}

/// Bilateral exercise configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BilateralConfig {
    #[serde(default = "default_bilateral_secs")]
    pub duration_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/hypnoflow/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub bilateral: BilateralConfig,
}

fn default_true() -> bool {
    true
}
fn default_volume() -> f64 {
    1.0
}
fn default_bilateral_secs() -> u64 {
    60
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            asset_dir: String::new(),
            volume: default_volume(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_instructions: true,
            json: false,
        }
    }
}

impl Default for BilateralConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_bilateral_secs(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent) = parent {
            for part in parent.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => {
                serde_json::Value::Bool(value.parse::<bool>().map_err(|e| invalid(e.to_string()))?)
            }
            serde_json::Value::Number(_) => {
                if let Ok(n) = value.parse::<u64>() {
                    serde_json::Value::Number(n.into())
                } else if let Ok(n) = value.parse::<f64>() {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                } else {
                    return Err(invalid(format!("cannot parse '{value}' as number")));
                }
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value has the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(ConfigError::InvalidValue {
                key: "audio.volume".into(),
                message: "must be between 0 and 1".into(),
            });
        }
        if self.bilateral.duration_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "bilateral.duration_secs".into(),
                message: "must be positive".into(),
            });
        }
        Ok(())
    }

    /// The built-in definition for `kind` with user overrides applied.
    pub fn definition_for(&self, kind: ExerciseKind) -> Result<ExerciseDefinition, ValidationError> {
        let definition = kind
            .definition()
            .with_total_ms(self.bilateral.duration_secs.saturating_mul(1000))?;
        let asset = definition.audio_asset().map(|asset| self.resolve_asset(asset));
        Ok(match (self.audio.enabled, asset) {
            (true, asset) => definition.with_audio_asset(asset),
            (false, _) => definition.with_audio_asset(None),
        })
    }

    fn resolve_asset(&self, asset: &str) -> String {
        if self.audio.asset_dir.is_empty() {
            asset.to_string()
        } else {
            Path::new(&self.audio.asset_dir).join(asset).to_string_lossy().into_owned()
        }
    }
}
