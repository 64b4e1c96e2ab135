//! Translation façade

use crate::cache::ResolutionCache;
use crate::error::{I18nError, I18nResult};
use crate::format::format_message;
use crate::locale::Locale;
use crate::naming::CatalogNaming;
use crate::replacement::Replacement;
use crate::scope::{IsolationScope, NoPlugins, PluginRegistry, ScopeResolver};
use crate::store::{CatalogStore, FileCatalogStore};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, trace};
use tunebot_config::{I18nConfig, DEFAULT_LOCALE, DEFAULT_RESOURCE_ROOT};

/// Resolves message keys against plugin-scoped catalogs.
///
/// A catalog is addressed by an optional short name (`None` is the root
/// catalog). Each catalog may be paired with an override catalog whose values
/// win over the base catalog. Keys missing from a named catalog fall through to
/// the root catalog when translating.
#[derive(Debug)]
pub struct Translator {
    naming: CatalogNaming,
    default_locale: Locale,
    cache: ResolutionCache,
}

impl Translator {
    /// Start building a translator
    pub fn builder() -> TranslatorBuilder {
        TranslatorBuilder::default()
    }

    /// Translator reading `.properties` files as configured, with every
    /// configured plugin registered.
    ///
    /// Plugins registered at runtime need a shared [`PluginRegistry`] passed
    /// to [`TranslatorBuilder::scope_resolver`] instead.
    pub fn from_config(config: &I18nConfig) -> I18nResult<Self> {
        let default_locale = Locale::parse(&config.default_locale)?;
        let registry = PluginRegistry::from_config(config)?;

        Self::builder()
            .naming(CatalogNaming::from(&config.naming))
            .resource_root(config.resource_root.clone())
            .store(FileCatalogStore::with_fallback_locale(default_locale.clone()))
            .scope_resolver(registry)
            .default_locale(default_locale)
            .build()
    }

    /// Whether the base catalog defines `key`.
    ///
    /// Override catalogs only replace values, so they are not consulted.
    /// Unresolvable catalogs yield `false`.
    pub fn has_key(&self, key: &str, locale: &Locale, catalog: Option<&str>) -> bool {
        let identifier = self.naming.normalize(catalog);
        match self.cache.get_or_load(&identifier, locale) {
            Ok(entry) => entry.base().contains_key(key),
            Err(err) => {
                trace!("Failed to get catalog {} for {}: {}", identifier, locale, err);
                false
            }
        }
    }

    /// Raw template for `key`: the override value, else the base value.
    ///
    /// Fails with [`I18nError::MessageNotFound`] when neither defines the key
    /// or the catalog does not exist.
    pub fn get(&self, key: &str, locale: &Locale, catalog: Option<&str>) -> I18nResult<String> {
        let identifier = self.naming.normalize(catalog);
        let not_found = || I18nError::MessageNotFound {
            key: key.to_string(),
            identifier: identifier.to_string(),
            locale: locale.to_string(),
        };

        let entry = match self.cache.get_or_load(&identifier, locale) {
            Ok(entry) => entry,
            Err(err) if err.is_catalog_not_found() => return Err(not_found()),
            Err(err) => return Err(err),
        };

        let result = entry.lookup(key).map(str::to_string).ok_or_else(not_found)?;
        trace!("Result: {} -> {}", key, result);
        Ok(result)
    }

    /// Translate and format `key`; never fails.
    ///
    /// Falls back to the root catalog when a named catalog lacks the key, and
    /// to the raw key when nothing resolves or formatting fails.
    pub fn translate(
        &self,
        key: &str,
        locale: &Locale,
        catalog: Option<&str>,
        replacements: &[Replacement],
    ) -> String {
        let template = match self.get(key, locale, catalog) {
            Ok(template) if template != key || self.naming.is_root(catalog) => template,
            Err(_) if self.naming.is_root(catalog) => {
                trace!(
                    "Unable to find translation for key '{}' in catalog '{}'",
                    key,
                    self.naming.root_catalog()
                );
                return key.to_string();
            }
            _ => {
                trace!(
                    "'{}' not found in catalog '{}', falling through to '{}'",
                    key,
                    catalog.unwrap_or_default(),
                    self.naming.root_catalog()
                );

                match self.get(key, locale, None) {
                    Ok(template) => template,
                    Err(_) => {
                        trace!(
                            "Unable to find translation for key '{}' in catalogs '{}', '{}'",
                            key,
                            catalog.unwrap_or_default(),
                            self.naming.root_catalog()
                        );
                        return key.to_string();
                    }
                }
            }
        };

        match format_message(&template, locale, replacements) {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                debug!("Message '{}' formatted to an empty string, using the key", key);
                key.to_string()
            }
            Err(source) => {
                let err = I18nError::Format {
                    key: key.to_string(),
                    source,
                };
                debug!("{}", err);
                key.to_string()
            }
        }
    }

    /// [`translate`](Self::translate) in the default locale
    pub fn translate_default(
        &self,
        key: &str,
        catalog: Option<&str>,
        replacements: &[Replacement],
    ) -> String {
        self.translate(key, &self.default_locale, catalog, replacements)
    }

    /// Locale used by [`translate_default`](Self::translate_default)
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Naming rules for catalog names
    pub fn naming(&self) -> &CatalogNaming {
        &self.naming
    }

    /// The underlying resolution cache
    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }
}

/// Builder for [`Translator`]
#[derive(Default)]
pub struct TranslatorBuilder {
    store: Option<Arc<dyn CatalogStore>>,
    resolver: Option<Arc<dyn ScopeResolver>>,
    naming: Option<CatalogNaming>,
    default_locale: Option<Locale>,
    resource_root: Option<PathBuf>,
}

impl TranslatorBuilder {
    /// Catalog source; defaults to a [`FileCatalogStore`] falling back to the
    /// default locale
    pub fn store(mut self, store: impl CatalogStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Scope resolver; defaults to [`NoPlugins`]
    pub fn scope_resolver(mut self, resolver: impl ScopeResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Catalog naming rules
    pub fn naming(mut self, naming: CatalogNaming) -> Self {
        self.naming = Some(naming);
        self
    }

    /// Default locale; `en` unless set
    pub fn default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = Some(locale);
        self
    }

    /// Resource root of the system scope
    pub fn resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resource_root = Some(root.into());
        self
    }

    /// Build the translator
    pub fn build(self) -> I18nResult<Translator> {
        let default_locale = match self.default_locale {
            Some(locale) => locale,
            None => Locale::parse(DEFAULT_LOCALE)?,
        };
        let naming = self.naming.unwrap_or_default();
        let system_scope = IsolationScope::system(
            self.resource_root
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE_ROOT)),
        );
        let store = self.store.unwrap_or_else(|| {
            Arc::new(FileCatalogStore::with_fallback_locale(default_locale.clone()))
        });
        let resolver = self.resolver.unwrap_or_else(|| Arc::new(NoPlugins));

        info!(
            "Translator initialized with default locale {} and resources in {:?}",
            default_locale,
            system_scope.resource_root()
        );

        Ok(Translator {
            cache: ResolutionCache::new(store, resolver, naming.clone(), system_scope),
            naming,
            default_locale,
        })
    }
}

impl fmt::Debug for TranslatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorBuilder")
            .field("has_store", &self.store.is_some())
            .field("has_resolver", &self.resolver.is_some())
            .field("naming", &self.naming)
            .field("default_locale", &self.default_locale)
            .field("resource_root", &self.resource_root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replacements;
    use crate::store::MemoryCatalogStore;

    fn en() -> Locale {
        Locale::parse("en").unwrap()
    }

    fn translator() -> Translator {
        let naming = CatalogNaming::default();
        let root = naming.root_id();
        let p1 = naming.normalize(Some("p1"));
        let store = MemoryCatalogStore::new()
            .with(None, &root, &en(), [("greeting", "Hello, {0}!"), ("shared", "root shared")])
            .with(None, &p1, &en(), [("only.p1", "P1 says {0}"), ("shared", "p1 shared")])
            .with(None, &naming.override_id(&p1), &en(), [("shared", "p1 override"), ("extra", "added")]);

        Translator::builder().store(store).build().unwrap()
    }

    #[test]
    fn test_translate_root_catalog() {
        let translator = translator();
        assert_eq!(
            translator.translate("greeting", &en(), None, &replacements!["Ada"]),
            "Hello, Ada!"
        );
    }

    #[test]
    fn test_falls_through_to_root_catalog() {
        let translator = translator();
        assert_eq!(
            translator.translate("greeting", &en(), Some("p1"), &replacements!["Ada"]),
            "Hello, Ada!"
        );
        assert_eq!(
            translator.translate("only.p1", &en(), Some("p1"), &replacements!["hi"]),
            "P1 says hi"
        );
    }

    #[test]
    fn test_override_wins_but_does_not_add_keys() {
        let translator = translator();
        assert_eq!(translator.get("shared", &en(), Some("p1")).unwrap(), "p1 override");
        assert!(translator.has_key("shared", &en(), Some("p1")));

        // Override-only keys are served by get but are not reported by has_key
        assert_eq!(translator.get("extra", &en(), Some("p1")).unwrap(), "added");
        assert!(!translator.has_key("extra", &en(), Some("p1")));
    }

    #[test]
    fn test_missing_key_and_catalog() {
        let translator = translator();
        assert!(!translator.has_key("nope", &en(), None));
        assert!(matches!(
            translator.get("nope", &en(), None),
            Err(I18nError::MessageNotFound { .. })
        ));
        assert!(matches!(
            translator.get("greeting", &en(), Some("missing")),
            Err(I18nError::MessageNotFound { .. })
        ));
        assert!(!translator.has_key("greeting", &en(), Some("missing")));
        assert_eq!(translator.translate("anykey", &en(), Some("missing"), &[]), "anykey");
    }

    #[test]
    fn test_format_failures_return_key() {
        let translator = translator();
        // greeting needs one argument
        assert_eq!(translator.translate("greeting", &en(), None, &[]), "greeting");
        // a lone quote formats to nothing
        assert_eq!(translator.translate("'", &en(), None, &[]), "'");
    }

    #[test]
    fn test_unresolved_key_is_returned_verbatim() {
        let translator = translator();
        let args = replacements!["x"];

        for catalog in [None, Some("core"), Some("p1"), Some("missing")] {
            assert_eq!(translator.translate("it's", &en(), catalog, &[]), "it's");
            assert_eq!(
                translator.translate("{0} items", &en(), catalog, &args),
                "{0} items"
            );
        }
    }

    #[test]
    fn test_translate_default_uses_default_locale() {
        let translator = translator();
        assert_eq!(translator.default_locale(), &en());
        assert_eq!(
            translator.translate_default("greeting", None, &replacements!["Bo"]),
            "Hello, Bo!"
        );
    }
}
