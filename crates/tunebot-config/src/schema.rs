//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tunebot_common::LoggingConfig;

/// Localization configuration for Tunebot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Locale used when the caller does not pick one, and before root resources.
    pub default_locale: String,
    /// Resource root of the system scope.
    pub resource_root: PathBuf,
    /// Catalog naming rules.
    pub naming: NamingConfig,
    /// Plugins owning catalogs.
    pub plugins: Vec<PluginConfig>,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Rules for turning short catalog names into catalog identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Namespace prefixed to every catalog name.
    pub namespace: String,
    /// Name of the root catalog, used when no catalog name is given.
    pub root_catalog: String,
    /// Segment appended to names with fewer than two separators.
    pub default_suffix: String,
    /// Marker appended to an identifier to address its override catalog.
    pub override_marker: String,
}

/// A plugin and the catalogs it ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Unique plugin id.
    pub id: String,
    /// Directory holding the plugin's resources.
    pub resource_root: PathBuf,
    /// Short names of the catalogs the plugin owns.
    #[serde(default)]
    pub catalogs: Vec<String>,
}

impl I18nConfig {
    /// Looks up a plugin by id.
    pub fn plugin(&self, id: &str) -> Option<&PluginConfig> {
        self.plugins.iter().find(|plugin| plugin.id == id)
    }
}
