#![forbid(unsafe_code)]

//! Core domain types for fieldrules
//!
//! This module defines the small value types shared by the engine, the
//! message pipeline and the configuration layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label scheme used when rendering field paths and `:attribute`
///
/// Every path element carries one label per style; the requester picks the
/// style that matches the shape of the data it received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStyle {
    /// Machine (declared) field names
    Field,
    /// Wire / serialization names
    #[default]
    Json,
    /// Form field names
    Form,
}

impl NamingStyle {
    /// All styles, in label order
    pub const ALL: [NamingStyle; 3] = [NamingStyle::Field, NamingStyle::Json, NamingStyle::Form];

    /// Position of this style inside a label triple
    pub fn index(self) -> usize {
        match self {
            NamingStyle::Field => 0,
            NamingStyle::Json => 1,
            NamingStyle::Form => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NamingStyle::Field => "field",
            NamingStyle::Json => "json",
            NamingStyle::Form => "form",
        }
    }
}

impl fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated rule name
///
/// Rule names must be non-empty and contain only alphanumeric characters and underscores,
/// so they can never collide with the `|`, `:` and `,` separators of a rule chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleName(String);

impl RuleName {
    /// Creates a new RuleName, validating the input
    ///
    /// Returns None if the input is empty or contains invalid characters
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() {
            return None;
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        Some(RuleName(name))
    }

    /// Returns the rule name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RuleName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RuleName::new(value).ok_or_else(|| "Invalid rule name".to_string())
    }
}

impl From<RuleName> for String {
    fn from(name: RuleName) -> Self {
        name.0
    }
}

/// A normalized language tag such as `en`, `en-gb` or `pt-br`
///
/// Tags are lowercased and `_` separators become `-`, so `en_GB`, `en-GB` and
/// `en-gb` all address the same catalog bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    /// The language used when a requester expresses no preference
    pub const DEFAULT: &'static str = "en";

    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into().trim().to_lowercase().replace('_', "-");
        LanguageTag(tag)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The portion before the first region separator (`en` for `en-gb`)
    pub fn base(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    /// True when the tag carries a region or script subtag
    pub fn has_subtag(&self) -> bool {
        self.0.contains('-')
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LanguageTag {
    fn from(tag: String) -> Self {
        LanguageTag::new(tag)
    }
}

impl From<&str> for LanguageTag {
    fn from(tag: &str) -> Self {
        LanguageTag::new(tag)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_name_validation() {
        assert!(RuleName::new("required").is_some());
        assert!(RuleName::new("digits_between").is_some());
        assert!(RuleName::new("ipv4").is_some());
        assert!(RuleName::new("").is_none());
        assert!(RuleName::new("min:3").is_none());
        assert!(RuleName::new("a|b").is_none());
        assert!(RuleName::new("not-allowed").is_none());
    }

    #[test]
    fn test_language_tag_normalization() {
        assert_eq!(LanguageTag::new("en-GB").as_str(), "en-gb");
        assert_eq!(LanguageTag::new("pt_BR").as_str(), "pt-br");
        assert_eq!(LanguageTag::new(" NL ").as_str(), "nl");
    }

    #[test]
    fn test_language_tag_base() {
        assert_eq!(LanguageTag::new("en-gb").base(), "en");
        assert_eq!(LanguageTag::new("zh-hant-tw").base(), "zh");
        assert_eq!(LanguageTag::new("de").base(), "de");
        assert!(LanguageTag::new("en-us").has_subtag());
        assert!(!LanguageTag::new("en").has_subtag());
    }

    #[test]
    fn test_naming_style_index_matches_all() {
        for (position, style) in NamingStyle::ALL.iter().enumerate() {
            assert_eq!(style.index(), position);
        }
        assert_eq!(NamingStyle::default(), NamingStyle::Json);
    }

    #[test]
    fn test_naming_style_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            naming: NamingStyle,
        }

        let parsed: Wrapper = toml::from_str("naming = \"form\"").unwrap();
        assert_eq!(parsed.naming, NamingStyle::Form);
    }
}
