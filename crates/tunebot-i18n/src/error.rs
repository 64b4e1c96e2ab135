//! Error types for internationalization operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving catalogs and messages
#[derive(Error, Debug)]
pub enum I18nError {
    /// Failed to parse a language identifier
    #[error("Invalid language identifier: {0}")]
    InvalidLocale(String),

    /// No catalog data exists for the identifier in this locale and scope
    #[error("Catalog '{identifier}' not found for locale {locale}")]
    CatalogNotFound {
        /// Normalized catalog identifier
        identifier: String,
        /// Requested locale
        locale: String,
    },

    /// Neither the override nor the base catalog defines the key
    #[error("Message '{key}' not found in catalog '{identifier}' for locale {locale}")]
    MessageNotFound {
        /// Message key that was looked up
        key: String,
        /// Normalized catalog identifier
        identifier: String,
        /// Requested locale
        locale: String,
    },

    /// A catalog file exists but is malformed
    #[error("Failed to parse catalog {path:?} at line {line}: {message}")]
    CatalogParse {
        /// Catalog file
        path: PathBuf,
        /// 1-based line of the malformed entry
        line: usize,
        /// What was wrong with it
        message: String,
    },

    /// A catalog identifier is already owned by another plugin
    #[error("Catalog '{identifier}' is already owned by plugin '{owner}'")]
    ScopeConflict {
        /// Normalized catalog identifier
        identifier: String,
        /// Current owner
        owner: String,
    },

    /// Failed to format a message template
    #[error("Failed to format message '{key}': {source}")]
    Format {
        /// Message key whose template failed
        key: String,
        /// Underlying formatter error
        #[source]
        source: FormatError,
    },

    /// IO error occurred while reading catalog data
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl I18nError {
    /// Whether this is the expected "no such catalog" outcome
    pub fn is_catalog_not_found(&self) -> bool {
        matches!(self, Self::CatalogNotFound { .. })
    }
}

/// Errors raised by the message formatter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A `{` was never closed
    #[error("unmatched '{{' at offset {offset}")]
    UnmatchedBrace {
        /// Character offset of the opening brace
        offset: usize,
    },

    /// The argument index is not a non-negative integer
    #[error("invalid argument index '{0}'")]
    InvalidArgumentIndex(String),

    /// The template references an argument that was not supplied
    #[error("argument {{{index}}} requested but only {supplied} supplied")]
    MissingArgument {
        /// Requested argument index
        index: usize,
        /// Number of arguments supplied
        supplied: usize,
    },

    /// The format type is not one of number, date, time, choice
    #[error("unknown format type '{0}'")]
    UnknownFormatType(String),

    /// The style is not valid for its format type
    #[error("invalid {kind} style '{style}'")]
    InvalidStyle {
        /// Format type the style belongs to
        kind: &'static str,
        /// The rejected style
        style: String,
    },

    /// A choice pattern could not be parsed
    #[error("invalid choice pattern '{0}'")]
    InvalidChoice(String),

    /// The argument cannot be formatted with the requested type
    #[error("argument {{{index}}} cannot be formatted as {expected}")]
    TypeMismatch {
        /// Argument index
        index: usize,
        /// Format type the argument was used with
        expected: &'static str,
    },
}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;
