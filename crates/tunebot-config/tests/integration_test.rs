//! Integration tests for tunebot-config crate.

use std::fs;
use tunebot_common::LogFormat;
use tunebot_config::{ConfigError, ConfigLoader};

#[test]
fn test_load_yaml_resolves_relative_roots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tunebot.yaml");
    fs::write(
        &path,
        r#"
default_locale: en-US
resource_root: resources
naming:
  root_catalog: core
plugins:
  - id: music
    resource_root: plugins/music
    catalogs: [music, music.commands]
  - id: quiz
    resource_root: /opt/tunebot/quiz
    catalogs: [quiz]
logging:
  level: debug
  format: compact
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();

    assert_eq!(config.default_locale, "en-US");
    assert_eq!(config.resource_root, dir.path().join("resources"));
    assert_eq!(config.plugins.len(), 2);

    let music = config.plugin("music").unwrap();
    assert_eq!(music.resource_root, dir.path().join("plugins/music"));
    assert_eq!(music.catalogs, vec!["music", "music.commands"]);

    let quiz = config.plugin("quiz").unwrap();
    assert!(quiz.resource_root.is_absolute());

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Compact);
}

#[test]
fn test_load_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tunebot.toml");
    fs::write(
        &path,
        r#"
default_locale = "de"

[naming]
namespace = "i18n"

[[plugins]]
id = "music"
resource_root = "plugins/music"
catalogs = ["music"]
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.default_locale, "de");
    assert_eq!(config.naming.namespace, "i18n");
    assert_eq!(config.naming.default_suffix, "strings");
    assert_eq!(config.plugins[0].id, "music");
}

#[test]
fn test_invalid_file_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tunebot.yaml");
    fs::write(&path, "default_locale: \"!!\"\n").unwrap();

    let err = ConfigLoader::load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigLoader::load_from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::IoError(_)));
}
