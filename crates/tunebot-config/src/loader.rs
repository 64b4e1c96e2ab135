//! Configuration loading utilities

use crate::schema::I18nConfig;
use crate::validator::ConfigValidator;
use anyhow::Context;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "TUNEBOT_CONFIG_PATH";
/// Environment override for `default_locale`.
pub const DEFAULT_LOCALE_VAR: &str = "TUNEBOT_DEFAULT_LOCALE";
/// Environment override for `resource_root`.
pub const RESOURCE_ROOT_VAR: &str = "TUNEBOT_RESOURCE_ROOT";
/// Environment override for `logging.level`.
pub const LOG_LEVEL_VAR: &str = "TUNEBOT_LOG_LEVEL";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The file extension names no supported format
    #[error("Unsupported configuration format: {0:?}")]
    UnsupportedFormat(PathBuf),

    /// Configuration validation error
    #[error("Invalid configuration value for '{field}': {message}")]
    Validation {
        /// Offending field path
        field: String,
        /// What is wrong with it
        message: String,
    },
}

/// Serialized configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML document
    Yaml,
    /// TOML document
    Toml,
}

impl ConfigFormat {
    /// Picks the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Configuration loader for the localization engine
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parse a configuration document without overrides or validation
    pub fn parse_str(content: &str, format: ConfigFormat) -> Result<I18nConfig, ConfigError> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        };
        Ok(config)
    }

    /// Load configuration from a YAML or TOML file with environment variable overrides.
    ///
    /// Relative resource roots are resolved against the file's directory.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<I18nConfig, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse_str(&content, format)?;

        if let Some(base) = path.parent() {
            Self::resolve_relative_roots(&mut config, base);
        }

        Self::apply_overrides_from(&mut config, |name| env::var(name).ok());
        ConfigValidator::validate(&config)?;

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration from `TUNEBOT_CONFIG_PATH`, `tunebot.yaml`,
    /// `tunebot.toml`, or defaults, in that order
    pub fn load() -> anyhow::Result<I18nConfig> {
        let candidates = [
            env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from),
            Some(PathBuf::from("tunebot.yaml")),
            Some(PathBuf::from("tunebot.toml")),
        ];

        for path in candidates.into_iter().flatten() {
            if path.exists() {
                info!("Using configuration file {:?}", path);
                return Self::load_from_file(&path)
                    .with_context(|| format!("loading configuration from {}", path.display()));
            }
        }

        let mut config = I18nConfig::default();
        Self::apply_overrides_from(&mut config, |name| env::var(name).ok());
        ConfigValidator::validate(&config).context("validating default configuration")?;
        info!("No configuration file found, using defaults");
        Ok(config)
    }

    /// Apply overrides read through `lookup`, normally the process environment
    pub fn apply_overrides_from<F>(config: &mut I18nConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(locale) = lookup(DEFAULT_LOCALE_VAR) {
            config.default_locale = locale;
        }

        if let Some(root) = lookup(RESOURCE_ROOT_VAR) {
            config.resource_root = PathBuf::from(root);
        }

        if let Some(level) = lookup(LOG_LEVEL_VAR) {
            config.logging.level = level;
        }
    }

    fn resolve_relative_roots(config: &mut I18nConfig, base: &Path) {
        if config.resource_root.is_relative() {
            config.resource_root = base.join(&config.resource_root);
        }
        for plugin in &mut config.plugins {
            if plugin.resource_root.is_relative() {
                plugin.resource_root = base.join(&plugin.resource_root);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/tunebot.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("tunebot.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(ConfigFormat::from_path(Path::new("tunebot.ini")).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (DEFAULT_LOCALE_VAR, "de-DE"),
            (RESOURCE_ROOT_VAR, "/srv/tunebot/resources"),
            (LOG_LEVEL_VAR, "tunebot_i18n=trace"),
        ]
        .into_iter()
        .collect();

        let mut config = I18nConfig::default();
        ConfigLoader::apply_overrides_from(&mut config, |name| {
            vars.get(name).map(ToString::to_string)
        });

        assert_eq!(config.default_locale, "de-DE");
        assert_eq!(config.resource_root, PathBuf::from("/srv/tunebot/resources"));
        assert_eq!(config.logging.level, "tunebot_i18n=trace");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = ConfigLoader::parse_str("default_locale: fr\n", ConfigFormat::Yaml).unwrap();
        assert_eq!(config.default_locale, "fr");
        assert_eq!(config.naming.root_catalog, "core");
        assert!(config.plugins.is_empty());
    }
}
