//! Plugin-scoped message resolution for Tunebot
//!
//! This crate resolves localized messages for the bot core and for plugins
//! loaded at runtime. It includes:
//!
//! - Catalog name normalization (`music` → `translations.music.strings`)
//! - Per-plugin isolation scopes and a plugin registry
//! - `.properties` catalogs with locale parent chains and a fallback locale
//! - Override catalogs that replace values of a base catalog
//! - A concurrent resolution cache that loads each catalog once
//! - Positional message formatting with locale-aware numbers and dates
//!
//! # Example
//!
//! ```rust
//! use tunebot_i18n::{replacements, CatalogNaming, Locale, MemoryCatalogStore, Translator};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let naming = CatalogNaming::default();
//! let en = Locale::parse("en")?;
//! let store = MemoryCatalogStore::new()
//!     .with(None, &naming.root_id(), &en, [("greeting", "Hello, {0}!")]);
//!
//! let translator = Translator::builder().store(store).build()?;
//! let message = translator.translate("greeting", &en, Some("music"), &replacements!["Ada"]);
//! assert_eq!(message, "Hello, Ada!");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod cache;
pub mod catalog;
pub mod error;
pub mod format;
pub mod locale;
pub mod naming;
pub mod properties;
pub mod replacement;
pub mod scope;
pub mod store;
pub mod symbols;
pub mod translator;

pub use cache::{CacheEntry, ResolutionCache};
pub use catalog::Catalog;
pub use error::{FormatError, I18nError, I18nResult};
pub use format::{format_message, MessageFormat};
pub use locale::Locale;
pub use naming::{CatalogId, CatalogNaming};
pub use replacement::Replacement;
pub use scope::{IsolationScope, NoPlugins, PluginDescriptor, PluginRegistry, ScopeResolver};
pub use store::{CatalogStore, FileCatalogStore, MemoryCatalogStore};
pub use translator::{Translator, TranslatorBuilder};
