//! Isolation scopes and the resolvers that assign catalogs to them
//!
//! A scope names the code unit (the system, or one plugin) whose resources are
//! searched for a catalog. Two scopes may ship catalogs with the same
//! identifier without colliding.

use crate::error::{I18nError, I18nResult};
use crate::naming::{CatalogId, CatalogNaming};
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use tunebot_config::{I18nConfig, PluginConfig};

/// Owner label used for the system scope in logs and errors
const SYSTEM_OWNER: &str = "<system>";

/// Handle identifying whose resources are searched when loading a catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IsolationScope {
    owner: Option<String>,
    resource_root: PathBuf,
}

impl IsolationScope {
    /// The system scope rooted at `resource_root`
    pub fn system(resource_root: impl Into<PathBuf>) -> Self {
        Self {
            owner: None,
            resource_root: resource_root.into(),
        }
    }

    /// The scope of plugin `id` rooted at `resource_root`
    pub fn plugin(id: impl Into<String>, resource_root: impl Into<PathBuf>) -> Self {
        Self {
            owner: Some(id.into()),
            resource_root: resource_root.into(),
        }
    }

    /// Owning plugin id; `None` for the system scope
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Whether this is the system scope
    pub fn is_system(&self) -> bool {
        self.owner.is_none()
    }

    /// Directory holding this scope's resources
    pub fn resource_root(&self) -> &Path {
        &self.resource_root
    }
}

impl fmt::Display for IsolationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(id) => write!(f, "plugin:{id}"),
            None => f.write_str(SYSTEM_OWNER),
        }
    }
}

/// Resolves which scope owns a catalog identifier
pub trait ScopeResolver: Send + Sync {
    /// The owning scope, or `None` for catalogs owned by no plugin
    fn resolve_scope(&self, identifier: &CatalogId) -> Option<IsolationScope>;

    /// Counter that changes whenever ownership changes. Cached misses recorded
    /// under an older generation are retried.
    fn generation(&self) -> u64 {
        0
    }
}

impl<R: ScopeResolver + ?Sized> ScopeResolver for Arc<R> {
    fn resolve_scope(&self, identifier: &CatalogId) -> Option<IsolationScope> {
        (**self).resolve_scope(identifier)
    }

    fn generation(&self) -> u64 {
        (**self).generation()
    }
}

/// Resolver for deployments without plugins
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlugins;

impl ScopeResolver for NoPlugins {
    fn resolve_scope(&self, _identifier: &CatalogId) -> Option<IsolationScope> {
        None
    }
}

/// A plugin and the short catalog names it ships
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    /// Unique plugin id
    pub id: String,
    /// Directory holding the plugin's resources
    pub resource_root: PathBuf,
    /// Short catalog names, normalized on registration
    pub catalogs: Vec<String>,
}

impl PluginDescriptor {
    /// Descriptor owning `catalogs` under `resource_root`
    pub fn new<I, S>(id: impl Into<String>, resource_root: impl Into<PathBuf>, catalogs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            resource_root: resource_root.into(),
            catalogs: catalogs.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&PluginConfig> for PluginDescriptor {
    fn from(config: &PluginConfig) -> Self {
        Self::new(
            config.id.clone(),
            config.resource_root.clone(),
            config.catalogs.iter().cloned(),
        )
    }
}

/// Registry of plugin-owned catalogs.
///
/// Reads are lock-free snapshots; registration publishes a new snapshot with
/// compare-and-swap, so lookups never see a half-registered plugin.
#[derive(Debug)]
pub struct PluginRegistry {
    naming: CatalogNaming,
    owners: ArcSwap<HashMap<CatalogId, IsolationScope>>,
    generation: AtomicU64,
}

impl PluginRegistry {
    /// Empty registry normalizing names with `naming`
    pub fn new(naming: CatalogNaming) -> Self {
        Self {
            naming,
            owners: ArcSwap::from_pointee(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Registry holding every plugin declared in the configuration
    pub fn from_config(config: &I18nConfig) -> I18nResult<Self> {
        let registry = Self::new(CatalogNaming::from(&config.naming));
        for plugin in &config.plugins {
            registry.register(&PluginDescriptor::from(plugin))?;
        }
        Ok(registry)
    }

    /// Register the catalogs of a plugin.
    ///
    /// Registering the same plugin again is a no-op for catalogs it already
    /// owns. A catalog owned by another plugin, or the root catalog, is a
    /// conflict and nothing is registered.
    pub fn register(&self, plugin: &PluginDescriptor) -> I18nResult<()> {
        let scope = IsolationScope::plugin(plugin.id.clone(), plugin.resource_root.clone());
        let root = self.naming.root_id();
        let identifiers: Vec<CatalogId> = plugin
            .catalogs
            .iter()
            .map(|name| self.naming.normalize(Some(name)))
            .collect();

        loop {
            let current = self.owners.load_full();
            let mut next = HashMap::clone(&current);

            for identifier in &identifiers {
                if *identifier == root {
                    return Err(I18nError::ScopeConflict {
                        identifier: identifier.to_string(),
                        owner: SYSTEM_OWNER.to_string(),
                    });
                }
                if let Some(owner) = current.get(identifier).and_then(IsolationScope::owner) {
                    if owner != plugin.id {
                        return Err(I18nError::ScopeConflict {
                            identifier: identifier.to_string(),
                            owner: owner.to_string(),
                        });
                    }
                }
                next.insert(identifier.clone(), scope.clone());
            }

            let previous = self.owners.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&*previous, &current) {
                break;
            }
            debug!("Concurrent registration detected, retrying plugin '{}'", plugin.id);
        }
        self.generation.fetch_add(1, Ordering::AcqRel);

        info!(
            "Registered plugin '{}' owning {} catalog(s)",
            plugin.id,
            identifiers.len()
        );
        Ok(())
    }

    /// Remove every catalog owned by `plugin_id`, returning how many were removed
    pub fn unregister(&self, plugin_id: &str) -> usize {
        let mut removed = 0;
        self.owners.rcu(|current| {
            let next: HashMap<_, _> = current
                .iter()
                .filter(|(_, scope)| scope.owner() != Some(plugin_id))
                .map(|(id, scope)| (id.clone(), scope.clone()))
                .collect();
            removed = current.len() - next.len();
            next
        });
        if removed > 0 {
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
        removed
    }

    /// Plugin id owning `identifier`
    pub fn owner_of(&self, identifier: &CatalogId) -> Option<String> {
        self.owners
            .load()
            .get(identifier)
            .and_then(|scope| scope.owner().map(str::to_string))
    }

    /// Number of registered catalog identifiers
    pub fn len(&self) -> usize {
        self.owners.load().len()
    }

    /// Whether no plugin catalogs are registered
    pub fn is_empty(&self) -> bool {
        self.owners.load().is_empty()
    }

    /// Naming rules used to normalize registered names
    pub fn naming(&self) -> &CatalogNaming {
        &self.naming
    }
}

impl ScopeResolver for PluginRegistry {
    fn resolve_scope(&self, identifier: &CatalogId) -> Option<IsolationScope> {
        self.owners.load().get(identifier).cloned()
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
