//! Persisted values for the preference catalog
//!
//! Values are stored as a flat TOML table keyed by the preference key
//! strings, in a file named after the preferences namespace:
//! ```text
//! <config dir>/camli/CamliUploader.toml
//!
//! "camli.host" = "https://camli.example.com"
//! "camli.auto" = true
//! "camli.auto.photos" = true
//! ```

use crate::prefs::{self, PreferenceKey};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading, saving, or editing the uploader configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown preference key: {0}")]
    UnknownKey(String),

    #[error("invalid value for {key}: {value:?} (expected true or false)")]
    InvalidValue { key: PreferenceKey, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<prefs::UnknownKey> for ConfigError {
    fn from(err: prefs::UnknownKey) -> Self {
        ConfigError::UnknownKey(err.0)
    }
}

/// Typed values for every value-bearing preference key
///
/// Switches default to off and text options default to unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderConfig {
    #[serde(rename = "camli.host", skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(rename = "camli.password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(rename = "camli.auto")]
    pub auto: bool,

    #[serde(rename = "camli.auto.opts", skip_serializing_if = "Option::is_none")]
    pub auto_opts: Option<String>,

    #[serde(rename = "camli.auto.require_power")]
    pub auto_require_power: bool,

    #[serde(rename = "camli.auto.require_wifi")]
    pub auto_require_wifi: bool,

    #[serde(rename = "camli.auto.photos")]
    pub auto_photos: bool,

    #[serde(rename = "camli.auto.mytracks")]
    pub auto_mytracks: bool,
}

impl UploaderConfig {
    /// Load configuration from `path`
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write configuration to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = toml::to_string(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Current value of `key` rendered as a string, `None` if unset
    pub fn get(&self, key: PreferenceKey) -> Option<String> {
        match key {
            PreferenceKey::Host => self.host.clone(),
            PreferenceKey::Password => self.password.clone(),
            PreferenceKey::AutoOpts => self.auto_opts.clone(),
            PreferenceKey::Auto => Some(self.auto.to_string()),
            PreferenceKey::AutoRequirePower => Some(self.auto_require_power.to_string()),
            PreferenceKey::AutoRequireWifi => Some(self.auto_require_wifi.to_string()),
            PreferenceKey::AutoDirPhotos => Some(self.auto_photos.to_string()),
            PreferenceKey::AutoDirMyTracks => Some(self.auto_mytracks.to_string()),
        }
    }

    /// Set `key` from its string form
    ///
    /// Switches accept `true`/`false`. An empty string clears a text option.
    pub fn set(&mut self, key: PreferenceKey, value: &str) -> Result<(), ConfigError> {
        match key {
            PreferenceKey::Host => self.host = text_value(value),
            PreferenceKey::Password => self.password = text_value(value),
            PreferenceKey::AutoOpts => self.auto_opts = text_value(value),
            PreferenceKey::Auto => self.auto = switch_value(key, value)?,
            PreferenceKey::AutoRequirePower => self.auto_require_power = switch_value(key, value)?,
            PreferenceKey::AutoRequireWifi => self.auto_require_wifi = switch_value(key, value)?,
            PreferenceKey::AutoDirPhotos => self.auto_photos = switch_value(key, value)?,
            PreferenceKey::AutoDirMyTracks => self.auto_mytracks = switch_value(key, value)?,
        }
        Ok(())
    }

    /// Look up a key by its string identifier and return its value
    pub fn get_by_name(&self, name: &str) -> Result<Option<String>, ConfigError> {
        let key: PreferenceKey = name.parse()?;
        Ok(self.get(key))
    }

    /// Look up a key by its string identifier and set its value
    pub fn set_by_name(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let key: PreferenceKey = name.parse()?;
        self.set(key, value)
    }

    /// Validate that the values are usable together
    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_host = self.host.as_deref().is_some_and(|h| !h.trim().is_empty());
        if self.auto && !has_host {
            return Err(ConfigError::Invalid(format!(
                "{} requires {} to be set",
                prefs::keys::AUTO,
                prefs::keys::HOST
            )));
        }
        Ok(())
    }
}

fn text_value(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn switch_value(key: PreferenceKey, value: &str) -> Result<bool, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Default location of the configuration file
///
/// `None` when the platform has no configuration directory.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("camli").join(format!("{}.toml", prefs::NAME)))
}
