//! Integration tests for tunebot-common crate.

use std::fs;
use tunebot_common::{init_logging, LogFormat, LoggingConfig, LoggingError};

#[test]
fn test_init_logging_writes_json_to_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("tunebot.log");

    let config = LoggingConfig {
        level: "debug".to_string(),
        ..LoggingConfig::production(&log_file)
    };
    assert_eq!(config.format, LogFormat::Json);

    init_logging(&config).unwrap();
    tracing::info!(catalog = "translations.core.strings", "catalog loaded");

    let contents = fs::read_to_string(&log_file).unwrap();
    assert!(contents.contains("catalog loaded"));
    assert!(contents.contains("translations.core.strings"));

    // A second global subscriber is refused instead of panicking
    let second = init_logging(&LoggingConfig::default());
    assert!(matches!(second, Err(LoggingError::AlreadyInitialized(_))));
}

#[cfg(feature = "testing")]
#[test]
fn test_resource_tree_layout() {
    use tunebot_common::test_utils::ResourceTree;

    let tree = ResourceTree::new();
    tree.system("translations/core/strings_en.properties", "greeting = Hello")
        .plugin("music", "translations/music/strings.properties", "play = Play");

    assert!(tree
        .system_root()
        .join("translations/core/strings_en.properties")
        .exists());
    assert!(tree
        .plugin_root("music")
        .join("translations/music/strings.properties")
        .exists());
}
