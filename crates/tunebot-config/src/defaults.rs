//! Default values for the localization configuration.

use crate::schema::{I18nConfig, NamingConfig};
use std::path::PathBuf;
use tunebot_common::LoggingConfig;

/// Default locale tag.
pub const DEFAULT_LOCALE: &str = "en";
/// Default resource root of the system scope.
pub const DEFAULT_RESOURCE_ROOT: &str = "resources";
/// Default catalog namespace.
pub const DEFAULT_NAMESPACE: &str = "translations";
/// Default root catalog name.
pub const DEFAULT_ROOT_CATALOG: &str = "core";
/// Default suffix segment.
pub const DEFAULT_SUFFIX: &str = "strings";
/// Default override marker.
pub const DEFAULT_OVERRIDE_MARKER: &str = "_override";

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            resource_root: PathBuf::from(DEFAULT_RESOURCE_ROOT),
            naming: NamingConfig::default(),
            plugins: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            root_catalog: DEFAULT_ROOT_CATALOG.to_string(),
            default_suffix: DEFAULT_SUFFIX.to_string(),
            override_marker: DEFAULT_OVERRIDE_MARKER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = I18nConfig::default();
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.resource_root, PathBuf::from("resources"));
        assert!(config.plugins.is_empty());
        assert_eq!(config.naming.namespace, "translations");
        assert_eq!(config.naming.root_catalog, "core");
        assert_eq!(config.naming.default_suffix, "strings");
        assert_eq!(config.naming.override_marker, "_override");
    }
}
