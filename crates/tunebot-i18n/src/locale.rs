//! Locale identifiers and resource suffix candidates

use crate::error::{I18nError, I18nResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// A language/region identifier used to address catalogs.
///
/// Accepts BCP-47 tags (`en-US`) as well as underscore tags (`en_US`). The
/// root locale (`und`) addresses resources without a locale suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(LanguageIdentifier);

impl Locale {
    /// Parse a locale from a language tag
    pub fn parse(tag: &str) -> I18nResult<Self> {
        let tag = tag.trim();
        if tag.is_empty() || tag.eq_ignore_ascii_case("root") {
            return Ok(Self::root());
        }

        tag.replace('_', "-")
            .parse::<LanguageIdentifier>()
            .map(Self)
            .map_err(|_| I18nError::InvalidLocale(tag.to_string()))
    }

    /// The root locale
    pub fn root() -> Self {
        Self(LanguageIdentifier::default())
    }

    /// Whether this is the root locale
    pub fn is_root(&self) -> bool {
        self.0.language.is_empty() && self.0.script.is_none() && self.0.region.is_none()
    }

    /// Language subtag, empty for the root locale
    pub fn language(&self) -> &str {
        if self.0.language.is_empty() {
            ""
        } else {
            self.0.language.as_str()
        }
    }

    /// Script subtag, if any
    pub fn script(&self) -> Option<&str> {
        self.0.script.as_ref().map(|script| script.as_str())
    }

    /// Region subtag, if any
    pub fn region(&self) -> Option<&str> {
        self.0.region.as_ref().map(|region| region.as_str())
    }

    /// The BCP-47 tag, e.g. `en-US`
    pub fn tag(&self) -> String {
        self.0.to_string()
    }

    /// Access the underlying language identifier
    pub fn language_identifier(&self) -> &LanguageIdentifier {
        &self.0
    }

    /// Resource file suffix for exactly this locale, e.g. `en_US`; empty for root
    pub fn resource_suffix(&self) -> String {
        if self.is_root() {
            return String::new();
        }
        [Some(self.language()), self.script(), self.region()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Suffixes to search, most specific first, ending with the root suffix.
    ///
    /// `zh-Hant-TW` yields `zh_Hant_TW`, `zh_Hant`, `zh_TW`, `zh`, and `""`.
    pub fn candidate_suffixes(&self) -> Vec<String> {
        let mut candidates = Vec::with_capacity(5);
        if !self.is_root() {
            let language = self.language();
            match (self.script(), self.region()) {
                (Some(script), Some(region)) => {
                    candidates.push(format!("{language}_{script}_{region}"));
                    candidates.push(format!("{language}_{script}"));
                    candidates.push(format!("{language}_{region}"));
                }
                (Some(script), None) => candidates.push(format!("{language}_{script}")),
                (None, Some(region)) => candidates.push(format!("{language}_{region}")),
                (None, None) => {}
            }
            if !language.is_empty() {
                candidates.push(language.to_string());
            }
        }
        candidates.push(String::new());
        candidates
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = I18nError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag()
    }
}

impl From<LanguageIdentifier> for Locale {
    fn from(id: LanguageIdentifier) -> Self {
        Self(id)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
