//! Resolution cache for (catalog identifier, locale) pairs
//!
//! Each key owns a once-cell slot inside a sharded map. Loads for one key run
//! inside that key's cell, so unrelated keys never wait on each other and
//! concurrent misses for the same key trigger a single store call.
//!
//! A catalog that does not exist is remembered as a miss, tagged with the
//! scope resolver's generation. Registering or unregistering a plugin moves
//! the generation on, and older misses are loaded again.

use crate::catalog::Catalog;
use crate::error::{I18nError, I18nResult};
use crate::locale::Locale;
use crate::naming::{CatalogId, CatalogNaming};
use crate::scope::{IsolationScope, ScopeResolver};
use crate::store::CatalogStore;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

type CacheKey = (CatalogId, Locale);
type Slot = Arc<OnceCell<Resolved>>;

/// Outcome stored in a slot
#[derive(Debug)]
enum Resolved {
    Found(Arc<CacheEntry>),
    Missing { generation: u64 },
}

impl Resolved {
    fn entry(&self) -> Option<&Arc<CacheEntry>> {
        match self {
            Self::Found(entry) => Some(entry),
            Self::Missing { .. } => None,
        }
    }
}

/// A base catalog and its optional override, resolved for one locale
#[derive(Debug)]
pub struct CacheEntry {
    base: Arc<Catalog>,
    override_catalog: Option<Arc<Catalog>>,
}

impl CacheEntry {
    /// Pair a base catalog with an optional override
    pub fn new(base: Catalog, override_catalog: Option<Catalog>) -> Self {
        Self {
            base: Arc::new(base),
            override_catalog: override_catalog.map(Arc::new),
        }
    }

    /// The base catalog
    pub fn base(&self) -> &Catalog {
        &self.base
    }

    /// The override catalog, if one exists
    pub fn override_catalog(&self) -> Option<&Catalog> {
        self.override_catalog.as_deref()
    }

    /// Template for `key`: override value first, then base value
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.override_catalog
            .as_deref()
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.base.get(key))
    }
}

/// Memoizes catalog loads per (identifier, locale).
///
/// Entries live for the lifetime of the cache. A missing catalog is cached as
/// a miss until the scope resolver's generation changes. Any other load error
/// is not cached, so the next request retries.
pub struct ResolutionCache {
    store: Arc<dyn CatalogStore>,
    resolver: Arc<dyn ScopeResolver>,
    naming: CatalogNaming,
    system_scope: IsolationScope,
    entries: DashMap<CacheKey, Slot>,
}

impl ResolutionCache {
    /// Create a cache loading from `store`, asking `resolver` for scopes and
    /// using `system_scope` for catalogs owned by no plugin
    pub fn new(
        store: Arc<dyn CatalogStore>,
        resolver: Arc<dyn ScopeResolver>,
        naming: CatalogNaming,
        system_scope: IsolationScope,
    ) -> Self {
        Self {
            store,
            resolver,
            naming,
            system_scope,
            entries: DashMap::new(),
        }
    }

    /// Return the cached entry, loading it on first use
    pub fn get_or_load(
        &self,
        identifier: &CatalogId,
        locale: &Locale,
    ) -> I18nResult<Arc<CacheEntry>> {
        let key = (identifier.clone(), locale.clone());
        let generation = self.resolver.generation();
        let not_found = || I18nError::CatalogNotFound {
            identifier: identifier.to_string(),
            locale: locale.to_string(),
        };

        if let Some(slot) = self.entries.get(&key).map(|slot| Arc::clone(slot.value())) {
            match slot.get() {
                Some(Resolved::Found(entry)) => {
                    trace!("Cache hit for {} ({})", identifier, locale);
                    return Ok(Arc::clone(entry));
                }
                Some(Resolved::Missing { generation: cached }) if *cached == generation => {
                    trace!("Cached miss for {} ({})", identifier, locale);
                    return Err(not_found());
                }
                Some(Resolved::Missing { .. }) => {
                    trace!("Stale miss for {} ({}), reloading", identifier, locale);
                    self.entries.remove_if(&key, |_, current| Arc::ptr_eq(current, &slot));
                }
                None => {}
            }
        }

        // Clone the slot out so the shard lock is released before loading
        let slot = Arc::clone(self.entries.entry(key.clone()).or_default().value());
        let resolved = slot.get_or_try_init(|| {
            match self.load_entry(identifier, locale) {
                Ok(entry) => Ok(Resolved::Found(entry)),
                Err(err) if err.is_catalog_not_found() => {
                    debug!("Catalog {} not found for {}, caching the miss", identifier, locale);
                    Ok(Resolved::Missing { generation })
                }
                Err(err) => Err(err),
            }
        });

        match resolved {
            Ok(Resolved::Found(entry)) => Ok(Arc::clone(entry)),
            Ok(Resolved::Missing { .. }) => Err(not_found()),
            Err(err) => {
                self.entries
                    .remove_if(&key, |_, current| current.get().is_none());
                Err(err)
            }
        }
    }

    fn load_entry(&self, identifier: &CatalogId, locale: &Locale) -> I18nResult<Arc<CacheEntry>> {
        let scope = self
            .resolver
            .resolve_scope(identifier)
            .unwrap_or_else(|| self.system_scope.clone());
        debug!("Resolving catalog {} for {} in {}", identifier, locale, scope);

        let base = self.store.load(identifier, locale, &scope)?;

        let override_id = self.naming.override_id(identifier);
        let override_catalog = match self.store.load(&override_id, locale, &scope) {
            Ok(catalog) => Some(catalog),
            Err(err) if err.is_catalog_not_found() => {
                trace!("No override catalog {} for {}", override_id, locale);
                None
            }
            Err(err) => return Err(err),
        };

        debug!(
            "Cached catalog {} for {} ({} base keys, override: {})",
            identifier,
            locale,
            base.keys().len(),
            override_catalog.is_some()
        );
        Ok(Arc::new(CacheEntry::new(base, override_catalog)))
    }

    /// Whether a loaded entry exists for the pair
    pub fn contains(&self, identifier: &CatalogId, locale: &Locale) -> bool {
        self.entries
            .get(&(identifier.clone(), locale.clone()))
            .is_some_and(|slot| slot.get().and_then(Resolved::entry).is_some())
    }

    /// Number of loaded entries
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|slot| slot.value().get().and_then(Resolved::entry).is_some())
            .count()
    }

    /// Whether nothing has been loaded yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Naming rules used to derive override identifiers
    pub fn naming(&self) -> &CatalogNaming {
        &self.naming
    }
}

impl fmt::Debug for ResolutionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionCache")
            .field("naming", &self.naming)
            .field("system_scope", &self.system_scope)
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
