//! Preference key catalog for the uploader
//!
//! Every option the uploader consults lives under a single namespace,
//! [`NAME`]. The catalog only names options: reading and writing values is
//! left to [`crate::config::UploaderConfig`].

use std::fmt;
use std::str::FromStr;

/// Namespace under which all uploader preferences are grouped
pub const NAME: &str = "CamliUploader";

/// String identifiers for each recognized option
pub mod keys {
    /// Target upload server
    pub const HOST: &str = "camli.host";
    /// Credential for the server
    pub const PASSWORD: &str = "camli.password";
    /// Master switch for automatic uploads
    pub const AUTO: &str = "camli.auto";
    /// Opaque sub-configuration for auto mode
    pub const AUTO_OPTS: &str = "camli.auto.opts";

    /// Only auto-upload while on external power
    pub const AUTO_REQUIRE_POWER: &str = "camli.auto.require_power";
    /// Only auto-upload while on Wi-Fi
    pub const AUTO_REQUIRE_WIFI: &str = "camli.auto.require_wifi";

    /// Watch the camera photos directory
    pub const AUTO_DIR_PHOTOS: &str = "camli.auto.photos";
    /// Watch the GPS tracks export directory
    pub const AUTO_DIR_MYTRACKS: &str = "camli.auto.mytracks";
}

/// Uninhabited marker for the catalog itself
///
/// The catalog is a namespace, so there is no value of this type.
#[derive(Debug)]
pub enum Preferences {}

/// A recognized preference option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PreferenceKey {
    Host,
    Password,
    Auto,
    AutoOpts,
    AutoRequirePower,
    AutoRequireWifi,
    AutoDirPhotos,
    AutoDirMyTracks,
}

impl PreferenceKey {
    /// Every key, in catalog order
    pub const ALL: [PreferenceKey; 8] = [
        PreferenceKey::Host,
        PreferenceKey::Password,
        PreferenceKey::Auto,
        PreferenceKey::AutoOpts,
        PreferenceKey::AutoRequirePower,
        PreferenceKey::AutoRequireWifi,
        PreferenceKey::AutoDirPhotos,
        PreferenceKey::AutoDirMyTracks,
    ];

    /// Stable string identifier of this key
    pub const fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::Host => keys::HOST,
            PreferenceKey::Password => keys::PASSWORD,
            PreferenceKey::Auto => keys::AUTO,
            PreferenceKey::AutoOpts => keys::AUTO_OPTS,
            PreferenceKey::AutoRequirePower => keys::AUTO_REQUIRE_POWER,
            PreferenceKey::AutoRequireWifi => keys::AUTO_REQUIRE_WIFI,
            PreferenceKey::AutoDirPhotos => keys::AUTO_DIR_PHOTOS,
            PreferenceKey::AutoDirMyTracks => keys::AUTO_DIR_MYTRACKS,
        }
    }

    /// Whether the key holds an on/off switch rather than free text
    pub const fn is_switch(self) -> bool {
        matches!(
            self,
            PreferenceKey::Auto
                | PreferenceKey::AutoRequirePower
                | PreferenceKey::AutoRequireWifi
                | PreferenceKey::AutoDirPhotos
                | PreferenceKey::AutoDirMyTracks
        )
    }

    /// Whether the value should be hidden when displayed
    pub const fn is_secret(self) -> bool {
        matches!(self, PreferenceKey::Password)
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for strings that are not in the catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preference key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for PreferenceKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PreferenceKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}
