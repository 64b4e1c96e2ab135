//! Catalog stores
//!
//! A store turns (identifier, locale, scope) into a [`Catalog`]. Only
//! structured key/value data is accepted; there is no way for a plugin to
//! supply code that acts as a catalog.
//!
//! Resolution follows the locale's suffix candidates. Every existing level is
//! chained child→parent. When nothing more specific than the root resource
//! exists, the store's fallback locale is tried before settling on root.

use crate::catalog::Catalog;
use crate::error::{I18nError, I18nResult};
use crate::locale::Locale;
use crate::naming::CatalogId;
use crate::properties::parse_properties;
use crate::scope::IsolationScope;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Source of catalog data
pub trait CatalogStore: Send + Sync {
    /// Load the catalog for `identifier` in `locale` from `scope`.
    ///
    /// Fails with [`I18nError::CatalogNotFound`] when no data exists.
    fn load(
        &self,
        identifier: &CatalogId,
        locale: &Locale,
        scope: &IsolationScope,
    ) -> I18nResult<Catalog>;
}

impl<S: CatalogStore + ?Sized> CatalogStore for Arc<S> {
    fn load(
        &self,
        identifier: &CatalogId,
        locale: &Locale,
        scope: &IsolationScope,
    ) -> I18nResult<Catalog> {
        (**self).load(identifier, locale, scope)
    }
}

/// Build the parent chain for `locale`, reading levels through `fetch`
fn resolve_chain<F>(
    identifier: &CatalogId,
    locale: &Locale,
    fallback: Option<&Locale>,
    mut fetch: F,
) -> I18nResult<Catalog>
where
    F: FnMut(&str) -> I18nResult<Option<HashMap<String, String>>>,
{
    let mut chain = collect_specific(locale, &mut fetch)?;

    if chain.is_empty() && !locale.is_root() {
        if let Some(fallback) = fallback.filter(|fallback| *fallback != locale) {
            trace!(
                "No {} resources for {}, trying fallback locale {}",
                identifier,
                locale,
                fallback
            );
            chain = collect_specific(fallback, &mut fetch)?;
        }
    }

    if let Some(entries) = fetch("")? {
        chain.push((String::new(), entries));
    }

    Catalog::chain(identifier, chain).ok_or_else(|| I18nError::CatalogNotFound {
        identifier: identifier.to_string(),
        locale: locale.to_string(),
    })
}

fn collect_specific<F>(
    locale: &Locale,
    fetch: &mut F,
) -> I18nResult<Vec<(String, HashMap<String, String>)>>
where
    F: FnMut(&str) -> I18nResult<Option<HashMap<String, String>>>,
{
    let mut found = Vec::new();
    for suffix in locale.candidate_suffixes() {
        if suffix.is_empty() {
            continue;
        }
        if let Some(entries) = fetch(&suffix)? {
            found.push((suffix, entries));
        }
    }
    Ok(found)
}

/// Whether every identifier segment is a plain, non-empty file name
fn is_path_safe(identifier: &CatalogId) -> bool {
    identifier.as_str().split('.').all(|segment| {
        !segment.is_empty() && !segment.contains(['/', '\\']) && segment.trim() == segment
    })
}

/// Store reading `.properties` files below each scope's resource root
#[derive(Debug, Clone, Default)]
pub struct FileCatalogStore {
    fallback_locale: Option<Locale>,
}

impl FileCatalogStore {
    /// Store without fallback locale
    pub fn new() -> Self {
        Self::default()
    }

    /// Store trying `locale` before root resources
    pub fn with_fallback_locale(locale: Locale) -> Self {
        Self {
            fallback_locale: Some(locale),
        }
    }

    /// The configured fallback locale
    pub fn fallback_locale(&self) -> Option<&Locale> {
        self.fallback_locale.as_ref()
    }

    fn read_level(path: PathBuf) -> I18nResult<Option<HashMap<String, String>>> {
        let content = match fs::read(&path) {
            Ok(bytes) => decode_properties(bytes, &path),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                warn!("Failed to read catalog resource {:?}: {}", path, err);
                return Err(err.into());
            }
        };

        let entries = parse_properties(&content).map_err(|err| I18nError::CatalogParse {
            path: path.clone(),
            line: err.line,
            message: err.message,
        })?;

        trace!("Read {} entries from {:?}", entries.len(), path);
        Ok(Some(entries))
    }
}

/// Decode catalog bytes as UTF-8, falling back to ISO-8859-1 for legacy files
fn decode_properties(bytes: Vec<u8>, path: &Path) -> String {
    match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(err) => {
            debug!("Catalog {:?} is not UTF-8, reading it as ISO-8859-1", path);
            err.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

impl CatalogStore for FileCatalogStore {
    fn load(
        &self,
        identifier: &CatalogId,
        locale: &Locale,
        scope: &IsolationScope,
    ) -> I18nResult<Catalog> {
        if !is_path_safe(identifier) {
            warn!("Refusing to load catalog with unsafe identifier '{}'", identifier);
            return Err(I18nError::CatalogNotFound {
                identifier: identifier.to_string(),
                locale: locale.to_string(),
            });
        }

        debug!("Loading catalog {} for {} from {}", identifier, locale, scope);
        let root = scope.resource_root();
        resolve_chain(identifier, locale, self.fallback_locale.as_ref(), |suffix| {
            Self::read_level(root.join(identifier.resource_path(suffix)))
        })
    }
}

/// Key of one resource level in a [`MemoryCatalogStore`]
type MemoryKey = (Option<String>, CatalogId, String);

/// In-process store, keyed by scope owner, identifier and locale suffix
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    levels: DashMap<MemoryKey, HashMap<String, String>>,
    fallback_locale: Option<Locale>,
}

impl MemoryCatalogStore {
    /// Empty store without fallback locale
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store trying `locale` before root resources
    pub fn with_fallback_locale(locale: Locale) -> Self {
        Self {
            levels: DashMap::new(),
            fallback_locale: Some(locale),
        }
    }

    /// Add entries for exactly `locale` of `identifier`, owned by `owner`
    /// (`None` for the system scope). Existing keys at that level are replaced.
    pub fn insert<I, K, V>(&self, owner: Option<&str>, identifier: &CatalogId, locale: &Locale, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let key = (
            owner.map(str::to_string),
            identifier.clone(),
            locale.resource_suffix(),
        );
        self.levels
            .entry(key)
            .or_default()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with<I, K, V>(self, owner: Option<&str>, identifier: &CatalogId, locale: &Locale, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(owner, identifier, locale, entries);
        self
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn load(
        &self,
        identifier: &CatalogId,
        locale: &Locale,
        scope: &IsolationScope,
    ) -> I18nResult<Catalog> {
        let owner = scope.owner().map(str::to_string);
        resolve_chain(identifier, locale, self.fallback_locale.as_ref(), |suffix| {
            let key = (owner.clone(), identifier.clone(), suffix.to_string());
            Ok(self.levels.get(&key).map(|level| level.value().clone()))
        })
    }
}
