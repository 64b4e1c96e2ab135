//! Immutable message catalogs

use crate::naming::CatalogId;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// An immutable key→template mapping loaded for one locale.
///
/// A catalog may have a parent holding the less specific locale's entries
/// (`strings_en_US` → `strings_en` → `strings`); lookups walk that chain.
#[derive(Debug, Clone)]
pub struct Catalog {
    identifier: CatalogId,
    suffix: String,
    entries: HashMap<String, String>,
    parent: Option<Arc<Catalog>>,
}

impl Catalog {
    /// Create a catalog without parent
    pub fn new(
        identifier: CatalogId,
        suffix: impl Into<String>,
        entries: HashMap<String, String>,
    ) -> Self {
        Self {
            identifier,
            suffix: suffix.into(),
            entries,
            parent: None,
        }
    }

    /// Chain resources ordered most specific first into one catalog.
    ///
    /// Returns `None` when `resources` is empty.
    pub fn chain<I>(identifier: &CatalogId, resources: I) -> Option<Self>
    where
        I: IntoIterator<Item = (String, HashMap<String, String>)>,
        I::IntoIter: DoubleEndedIterator,
    {
        resources
            .into_iter()
            .rev()
            .fold(None, |parent: Option<Self>, (suffix, entries)| {
                Some(Self {
                    identifier: identifier.clone(),
                    suffix,
                    entries,
                    parent: parent.map(Arc::new),
                })
            })
    }

    /// Look up a template, walking the parent chain
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut current = Some(self);
        while let Some(catalog) = current {
            if let Some(value) = catalog.entries.get(key) {
                return Some(value.as_str());
            }
            current = catalog.parent.as_deref();
        }
        None
    }

    /// Whether the key is defined in this catalog or its parents
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All keys visible through this catalog, sorted
    pub fn keys(&self) -> BTreeSet<&str> {
        let mut keys = BTreeSet::new();
        let mut current = Some(self);
        while let Some(catalog) = current {
            keys.extend(catalog.entries.keys().map(String::as_str));
            current = catalog.parent.as_deref();
        }
        keys
    }

    /// Identifier the catalog was loaded for
    pub fn identifier(&self) -> &CatalogId {
        &self.identifier
    }

    /// Locale suffix of the resource this level came from; empty for root
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The less specific catalog, if any
    pub fn parent(&self) -> Option<&Catalog> {
        self.parent.as_deref()
    }

    /// Number of entries defined at this level
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this level defines no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_chain_walks_parents() {
        let id = CatalogId::new("translations.core.strings");
        let catalog = Catalog::chain(
            &id,
            vec![
                ("en_US".to_string(), entries(&[("color", "color")])),
                ("en".to_string(), entries(&[("color", "colour"), ("hello", "Hello")])),
                (String::new(), entries(&[("fallback", "Root")])),
            ],
        )
        .unwrap();

        assert_eq!(catalog.suffix(), "en_US");
        assert_eq!(catalog.get("color"), Some("color"));
        assert_eq!(catalog.get("hello"), Some("Hello"));
        assert_eq!(catalog.get("fallback"), Some("Root"));
        assert_eq!(catalog.get("missing"), None);
        assert_eq!(catalog.parent().unwrap().suffix(), "en");
        assert_eq!(catalog.keys().into_iter().collect::<Vec<_>>(), vec!["color", "fallback", "hello"]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_chain_of_nothing() {
        let id = CatalogId::new("translations.core.strings");
        assert!(Catalog::chain(&id, Vec::<(String, HashMap<String, String>)>::new()).is_none());
    }
}
