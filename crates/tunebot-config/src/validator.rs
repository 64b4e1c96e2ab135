//! Runtime validation of a loaded configuration.

use crate::loader::ConfigError;
use crate::schema::{I18nConfig, NamingConfig};
use std::collections::HashSet;
use unic_langid::LanguageIdentifier;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &I18nConfig) -> Result<(), ConfigError> {
        validate_locale_tag(&config.default_locale)?;
        Self::validate_naming(&config.naming)?;

        let mut ids = HashSet::new();
        for plugin in &config.plugins {
            if plugin.id.trim().is_empty() {
                return Err(invalid("plugins.id", "plugin id cannot be empty"));
            }
            if !ids.insert(plugin.id.as_str()) {
                return Err(invalid(
                    "plugins.id",
                    format!("duplicate plugin id '{}'", plugin.id),
                ));
            }
            if plugin.catalogs.iter().any(|name| name.trim().is_empty()) {
                return Err(invalid(
                    "plugins.catalogs",
                    format!("plugin '{}' declares an empty catalog name", plugin.id),
                ));
            }
        }

        Ok(())
    }

    fn validate_naming(naming: &NamingConfig) -> Result<(), ConfigError> {
        let fields = [
            ("naming.namespace", &naming.namespace),
            ("naming.root_catalog", &naming.root_catalog),
            ("naming.default_suffix", &naming.default_suffix),
            ("naming.override_marker", &naming.override_marker),
        ];

        for (field, value) in fields {
            if value.is_empty() {
                return Err(invalid(field, "value cannot be empty"));
            }
            if value.contains(['/', '\\']) {
                return Err(invalid(field, "value cannot contain path separators"));
            }
        }

        if naming.override_marker.contains('.') {
            return Err(invalid(
                "naming.override_marker",
                "marker cannot contain '.'",
            ));
        }

        Ok(())
    }
}

/// Accepts BCP-47 (`en-US`) and underscore (`en_US`) tags.
pub fn validate_locale_tag(tag: &str) -> Result<(), ConfigError> {
    tag.replace('_', "-")
        .parse::<LanguageIdentifier>()
        .map(|_| ())
        .map_err(|_| invalid("default_locale", format!("invalid locale tag '{tag}'")))
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PluginConfig;
    use std::path::PathBuf;

    fn plugin(id: &str, catalogs: &[&str]) -> PluginConfig {
        PluginConfig {
            id: id.to_string(),
            resource_root: PathBuf::from(format!("plugins/{id}")),
            catalogs: catalogs.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&I18nConfig::default()).is_ok());
    }

    #[test]
    fn test_locale_tags() {
        assert!(validate_locale_tag("en").is_ok());
        assert!(validate_locale_tag("en-US").is_ok());
        assert!(validate_locale_tag("pt_BR").is_ok());
        assert!(validate_locale_tag("not a locale").is_err());
    }

    #[test]
    fn test_duplicate_plugin_ids_rejected() {
        let config = I18nConfig {
            plugins: vec![plugin("music", &["music"]), plugin("music", &["quiz"])],
            ..I18nConfig::default()
        };

        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate plugin id 'music'"));
    }

    #[test]
    fn test_empty_catalog_name_rejected() {
        let config = I18nConfig {
            plugins: vec![plugin("music", &["music", " "])],
            ..I18nConfig::default()
        };
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_naming_rejects_path_separators() {
        let mut config = I18nConfig::default();
        config.naming.root_catalog = "../core".to_string();
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = I18nConfig::default();
        config.naming.override_marker = ".override".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
