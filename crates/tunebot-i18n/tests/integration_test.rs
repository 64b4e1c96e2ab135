//! Integration tests for catalog resolution against on-disk resources

use std::sync::Arc;
use tunebot_common::test_utils::{init_test_logging, ResourceTree};
use tunebot_config::{I18nConfig, PluginConfig};
use tunebot_i18n::{
    replacements, CatalogNaming, I18nError, Locale, PluginDescriptor, PluginRegistry, Translator,
};

fn locale(tag: &str) -> Locale {
    Locale::parse(tag).unwrap()
}

/// Build a translator for `tree` with `(plugin id, catalog)` pairs registered
fn translator(tree: &ResourceTree, plugins: &[(&str, &str)]) -> Translator {
    init_test_logging();

    let config = I18nConfig {
        default_locale: "en".to_string(),
        resource_root: tree.system_root(),
        plugins: plugins
            .iter()
            .map(|(id, catalog)| PluginConfig {
                id: (*id).to_string(),
                resource_root: tree.plugin_root(id),
                catalogs: vec![(*catalog).to_string()],
            })
            .collect(),
        ..I18nConfig::default()
    };

    Translator::from_config(&config).unwrap()
}

fn core_tree() -> ResourceTree {
    let tree = ResourceTree::new();
    tree.system(
        "translations/core/strings.properties",
        "greeting = Hello, {0}!\nfarewell = Goodbye\n",
    )
    .system("translations/core/strings_de.properties", "greeting = Hallo, {0}!\n")
    .system("translations/p1/strings_en.properties", "other = Something else\n");
    tree
}

#[test]
fn test_translate_from_root_catalog() {
    let tree = core_tree();
    let translator = translator(&tree, &[]);

    assert_eq!(
        translator.translate("greeting", &locale("en"), None, &replacements!["Ada"]),
        "Hello, Ada!"
    );
}

#[test]
fn test_named_catalog_falls_through_to_root() {
    let tree = core_tree();
    let translator = translator(&tree, &[]);

    assert!(!translator.has_key("greeting", &locale("en"), Some("p1")));
    assert_eq!(
        translator.translate("greeting", &locale("en"), Some("p1"), &replacements!["Ada"]),
        "Hello, Ada!"
    );
    assert_eq!(
        translator.translate("other", &locale("en"), Some("p1"), &[]),
        "Something else"
    );
}

#[test]
fn test_override_catalog_wins() {
    let tree = ResourceTree::new();
    tree.system("translations/p1/strings_en.properties", "greeting = Hello, {0}!\n")
        .system("translations/p1/strings_override_en.properties", "greeting = Hi, {0}.\n");
    let translator = translator(&tree, &[]);

    let en = locale("en");
    assert_eq!(translator.get("greeting", &en, Some("p1")).unwrap(), "Hi, {0}.");
    assert_eq!(
        translator.translate("greeting", &en, Some("p1"), &replacements!["Ada"]),
        "Hi, Ada."
    );
}

#[test]
fn test_nothing_resolves_returns_key() {
    let tree = ResourceTree::new();
    let translator = translator(&tree, &[]);
    let en = locale("en");

    assert_eq!(translator.translate("anykey", &en, Some("missing"), &[]), "anykey");
    assert_eq!(translator.translate("anykey", &en, None, &[]), "anykey");
    assert!(!translator.has_key("anykey", &en, Some("missing")));
    assert!(matches!(
        translator.get("anykey", &en, Some("missing")),
        Err(I18nError::MessageNotFound { .. })
    ));
}

#[test]
fn test_locale_parent_chain() {
    let tree = core_tree();
    let translator = translator(&tree, &[]);
    let de_at = locale("de-AT");

    assert_eq!(
        translator.translate("greeting", &de_at, None, &replacements!["Ada"]),
        "Hallo, Ada!"
    );
    assert_eq!(translator.translate("farewell", &de_at, None, &[]), "Goodbye");
}

#[test]
fn test_region_resources_fall_back_through_language() {
    let tree = ResourceTree::new();
    tree.system("translations/core/strings_en.properties", "color = colour\nhello = Hello\n")
        .system("translations/core/strings_en_US.properties", "color = color\n")
        .system("translations/core/strings.properties", "bye = Bye\n");
    let translator = translator(&tree, &[]);
    let en_us = locale("en_US");

    assert_eq!(translator.get("color", &en_us, None).unwrap(), "color");
    assert_eq!(translator.get("hello", &en_us, None).unwrap(), "Hello");
    assert_eq!(translator.get("bye", &en_us, None).unwrap(), "Bye");
    assert_eq!(translator.get("color", &locale("en-GB"), None).unwrap(), "colour");
}

#[test]
fn test_fallback_locale_is_used_before_root() {
    let tree = ResourceTree::new();
    tree.system("translations/core/strings_en.properties", "hello = Hello\n")
        .system("translations/core/strings.properties", "hello = (root) hello\n");
    let translator = translator(&tree, &[]);

    assert_eq!(translator.translate("hello", &locale("fr"), None, &[]), "Hello");
    assert_eq!(translator.translate_default("hello", None, &[]), "Hello");
}

#[test]
fn test_plugin_catalogs_are_isolated() {
    let tree = ResourceTree::new();
    tree.system("translations/core/strings.properties", "greeting = Hello\n")
        .system("translations/music/strings_en.properties", "play = from the system scope\n")
        .plugin("music", "translations/music/strings_en.properties", "play = Now playing {0}\n")
        .plugin(
            "music",
            "translations/music/strings_override_en.properties",
            "play = \\u25B6 {0}\n",
        )
        .plugin("quiz", "translations/quiz/strings_en.properties", "question = Ready?\n");
    let translator = translator(&tree, &[("music", "music")]);
    let en = locale("en");

    assert!(translator.has_key("play", &en, Some("music")));
    assert_eq!(
        translator.translate("play", &en, Some("music"), &replacements!["Song"]),
        "\u{25b6} Song"
    );

    // quiz is not registered, so its resources are never searched
    assert!(!translator.has_key("question", &en, Some("quiz")));
    assert_eq!(translator.translate("question", &en, Some("quiz"), &[]), "question");
}

#[test]
fn test_plugin_registered_after_startup() {
    init_test_logging();
    let tree = ResourceTree::new();
    tree.system("translations/core/strings.properties", "greeting = Hello\n")
        .plugin("radio", "translations/radio/strings_en.properties", "tune = Tuned in\n");

    let registry = Arc::new(PluginRegistry::new(CatalogNaming::default()));
    let translator = Translator::builder()
        .resource_root(tree.system_root())
        .scope_resolver(Arc::clone(&registry))
        .build()
        .unwrap();
    let en = locale("en");

    assert_eq!(translator.translate("tune", &en, Some("radio"), &[]), "tune");

    registry
        .register(&PluginDescriptor::new("radio", tree.plugin_root("radio"), ["radio"]))
        .unwrap();
    assert_eq!(translator.translate("tune", &en, Some("radio"), &[]), "Tuned in");
}

#[test]
fn test_choice_and_number_formatting_from_catalog() {
    let tree = ResourceTree::new();
    tree.system(
        "translations/core/strings_en.properties",
        "queue.size = {0,choice,0#The queue is empty|1#One track queued|1<{0,number,integer} tracks queued}\n",
    )
    .system(
        "translations/core/strings_de.properties",
        "queue.size = {0,choice,0#Die Warteschlange ist leer|1#Ein Titel|1<{0,number,integer} Titel}\n",
    );
    let translator = translator(&tree, &[]);
    let (en, de) = (locale("en"), locale("de"));

    assert_eq!(translator.translate("queue.size", &en, None, &replacements![0]), "The queue is empty");
    assert_eq!(translator.translate("queue.size", &en, None, &replacements![1]), "One track queued");
    assert_eq!(
        translator.translate("queue.size", &en, None, &replacements![1500]),
        "1,500 tracks queued"
    );
    assert_eq!(translator.translate("queue.size", &de, None, &replacements![1500]), "1.500 Titel");
}

#[test]
fn test_properties_syntax_in_catalog_files() {
    let tree = ResourceTree::new();
    tree.system(
        "translations/core/strings_en.properties",
        "# Comment line\n\
         ! another comment\n\
         long.message = first part, \\\n    second part\n\
         umlaut = Gr\\u00fc\\u00dfe\n\
         spaced\\ key : value\n",
    );
    let translator = translator(&tree, &[]);
    let en = locale("en");

    assert_eq!(translator.get("long.message", &en, None).unwrap(), "first part, second part");
    assert_eq!(translator.get("umlaut", &en, None).unwrap(), "Grüße");
    assert_eq!(translator.get("spaced key", &en, None).unwrap(), "value");
}

#[test]
fn test_latin1_catalog_is_readable() {
    let tree = ResourceTree::new();
    tree.system(
        "translations/core/strings_de.properties",
        b"greeting = Gr\xfc\xdfe, {0}\n".as_slice(),
    );
    let translator = translator(&tree, &[]);
    let de = locale("de");

    assert!(translator.has_key("greeting", &de, None));
    assert_eq!(translator.get("greeting", &de, None).unwrap(), "Grüße, {0}");
    assert_eq!(
        translator.translate("greeting", &de, None, &replacements!["Ada"]),
        "Grüße, Ada"
    );
}

#[test]
fn test_missing_catalog_is_not_reread() {
    let tree = ResourceTree::new();
    let translator = translator(&tree, &[]);
    let en = locale("en");

    assert_eq!(translator.translate("k", &en, Some("missing"), &[]), "k");

    // Files appearing later are not picked up for a cached miss
    tree.system("translations/missing/strings_en.properties", "k = found\n");
    assert_eq!(translator.translate("k", &en, Some("missing"), &[]), "k");
    assert!(translator.cache().is_empty());
}

#[test]
fn test_malformed_catalog_is_reported() {
    let tree = ResourceTree::new();
    tree.system("translations/broken/strings_en.properties", "ok = fine\nbad = \\u12G4\n")
        .system("translations/core/strings.properties", "ok = root fine\n");
    let translator = translator(&tree, &[]);
    let en = locale("en");

    let err = translator.get("ok", &en, Some("broken")).unwrap_err();
    assert!(matches!(err, I18nError::CatalogParse { line: 2, .. }));
    assert!(!translator.has_key("ok", &en, Some("broken")));

    // translate recovers through the root catalog
    assert_eq!(translator.translate("ok", &en, Some("broken"), &[]), "root fine");
}

#[test]
fn test_entries_are_cached() {
    let tree = core_tree();
    let translator = translator(&tree, &[]);
    let en = locale("en");
    let root = translator.naming().root_id();

    assert!(translator.cache().is_empty());
    let first = translator.translate("greeting", &en, None, &replacements!["Ada"]);
    let second = translator.translate("greeting", &en, None, &replacements!["Ada"]);

    assert_eq!(first, second);
    assert!(translator.cache().contains(&root, &en));
    assert_eq!(translator.cache().len(), 1);
}
