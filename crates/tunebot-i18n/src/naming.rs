//! Catalog name normalization
//!
//! Short catalog names such as `music` are turned into fully qualified
//! identifiers such as `translations.music.strings`. An absent name means the
//! root catalog.

use std::fmt;
use std::path::PathBuf;
use tunebot_config::{
    NamingConfig, DEFAULT_NAMESPACE, DEFAULT_OVERRIDE_MARKER, DEFAULT_ROOT_CATALOG, DEFAULT_SUFFIX,
};

/// Separator between identifier segments.
const SEPARATOR: char = '.';

/// Extension of catalog resource files.
pub const RESOURCE_EXTENSION: &str = "properties";

/// A fully qualified catalog identifier, e.g. `translations.music.strings`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogId(String);

impl CatalogId {
    /// Wrap an already normalized identifier
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// The identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier of the override catalog paired with this one
    pub fn with_marker(&self, marker: &str) -> Self {
        Self(format!("{}{marker}", self.0))
    }

    /// Resource path for one locale suffix.
    ///
    /// `translations.music.strings` with suffix `en_US` maps to
    /// `translations/music/strings_en_US.properties`; an empty suffix maps to
    /// the locale-less base resource.
    pub fn resource_path(&self, suffix: &str) -> PathBuf {
        let mut path: PathBuf = self.0.split(SEPARATOR).collect();
        let file_stem = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = if suffix.is_empty() {
            format!("{file_stem}.{RESOURCE_EXTENSION}")
        } else {
            format!("{file_stem}_{suffix}.{RESOURCE_EXTENSION}")
        };
        path.set_file_name(file_name);
        path
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CatalogId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalization rules for catalog names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogNaming {
    namespace: String,
    root_catalog: String,
    default_suffix: String,
    override_marker: String,
}

impl CatalogNaming {
    /// Rules with custom constants
    pub fn new(
        namespace: impl Into<String>,
        root_catalog: impl Into<String>,
        default_suffix: impl Into<String>,
        override_marker: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            root_catalog: root_catalog.into(),
            default_suffix: default_suffix.into(),
            override_marker: override_marker.into(),
        }
    }

    /// Normalize an optional short name into a catalog identifier.
    ///
    /// Absent names become the root catalog; the namespace is prefixed; the
    /// default suffix is appended while fewer than two separators are present.
    pub fn normalize(&self, short_name: Option<&str>) -> CatalogId {
        let name = short_name.unwrap_or(self.root_catalog.as_str());
        let mut identifier = format!("{}{SEPARATOR}{name}", self.namespace);

        if identifier.matches(SEPARATOR).count() < 2 {
            identifier.push(SEPARATOR);
            identifier.push_str(&self.default_suffix);
        }

        CatalogId(identifier)
    }

    /// Identifier of the root catalog
    pub fn root_id(&self) -> CatalogId {
        self.normalize(None)
    }

    /// Whether `short_name` addresses the root catalog
    pub fn is_root(&self, short_name: Option<&str>) -> bool {
        short_name.map_or(true, |name| self.normalize(Some(name)) == self.root_id())
    }

    /// Identifier of the override catalog paired with `identifier`
    pub fn override_id(&self, identifier: &CatalogId) -> CatalogId {
        identifier.with_marker(&self.override_marker)
    }

    /// Root catalog short name
    pub fn root_catalog(&self) -> &str {
        &self.root_catalog
    }
}

impl Default for CatalogNaming {
    fn default() -> Self {
        Self::new(
            DEFAULT_NAMESPACE,
            DEFAULT_ROOT_CATALOG,
            DEFAULT_SUFFIX,
            DEFAULT_OVERRIDE_MARKER,
        )
    }
}

impl From<&NamingConfig> for CatalogNaming {
    fn from(config: &NamingConfig) -> Self {
        Self::new(
            config.namespace.clone(),
            config.root_catalog.clone(),
            config.default_suffix.clone(),
            config.override_marker.clone(),
        )
    }
}
