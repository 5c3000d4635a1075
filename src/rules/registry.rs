#![forbid(unsafe_code)]

//! Rule registry: rule functions and their message catalogs
//!
//! The registry is built once, before any validation runs, and then shared
//! read-only. Registering a name a second time replaces the rule and drops
//! the messages registered for the old one.

use std::collections::HashMap;

use tracing::warn;

use crate::error::RegistryError;
use crate::messages::MessageResolver;
use crate::messages::catalog;
use crate::rules::builtin;
use crate::rules::parser::{self, RuleCall};
use crate::rules::Rule;
use crate::types::{LanguageTag, RuleName};

/// Languages that receive the base catalog
const BASE_LANGUAGES: [&str; 3] = ["en", "en-us", "en-gb"];

/// A registered rule and its messages keyed by language
pub struct RegisteredRule {
    rule: Box<dyn Rule>,
    messages: HashMap<LanguageTag, MessageResolver>,
}

impl RegisteredRule {
    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    pub fn message(&self, language: &LanguageTag) -> Option<&MessageResolver> {
        self.messages.get(language)
    }

    /// Languages with a message, sorted
    pub fn languages(&self) -> Vec<&LanguageTag> {
        let mut languages: Vec<_> = self.messages.keys().collect();
        languages.sort();
        languages
    }
}

/// Registry for storing rules by name
#[derive(Default)]
pub struct RuleRegistry {
    rules: HashMap<RuleName, RegisteredRule>,
}

impl RuleRegistry {
    /// Create a new empty RuleRegistry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every builtin rule with its English messages
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry.register_base_messages(catalog::english());
        registry
    }

    /// Register a rule under `name`
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidName` if the name is empty or contains
    /// characters other than ASCII letters, digits and underscores.
    pub fn register<R>(&mut self, name: &str, rule: R) -> Result<(), RegistryError>
    where
        R: Rule + 'static,
    {
        let name =
            RuleName::new(name).ok_or_else(|| RegistryError::InvalidName(name.to_string()))?;
        self.rules.insert(
            name,
            RegisteredRule {
                rule: Box::new(rule),
                messages: HashMap::new(),
            },
        );
        Ok(())
    }

    /// Register messages for `language` and, for a tag such as `en-gb`, its base `en`
    pub fn register_messages<I, S>(&mut self, language: impl Into<LanguageTag>, messages: I)
    where
        I: IntoIterator<Item = (S, MessageResolver)>,
        S: AsRef<str>,
    {
        let language = language.into();
        let mut languages = vec![language.clone()];
        if language.has_subtag() {
            languages.push(LanguageTag::new(language.base()));
        }
        self.register_for(&languages, messages);
    }

    /// Register messages for exactly `language`, without seeding its base
    pub fn register_messages_strict<I, S>(&mut self, language: impl Into<LanguageTag>, messages: I)
    where
        I: IntoIterator<Item = (S, MessageResolver)>,
        S: AsRef<str>,
    {
        self.register_for(&[language.into()], messages);
    }

    /// Register the default messages under `en`, `en-us` and `en-gb`
    pub fn register_base_messages<I, S>(&mut self, messages: I)
    where
        I: IntoIterator<Item = (S, MessageResolver)>,
        S: AsRef<str>,
    {
        let languages = BASE_LANGUAGES.map(LanguageTag::new);
        self.register_for(&languages, messages);
    }

    fn register_for<I, S>(&mut self, languages: &[LanguageTag], messages: I)
    where
        I: IntoIterator<Item = (S, MessageResolver)>,
        S: AsRef<str>,
    {
        for (name, resolver) in messages {
            let name = name.as_ref();
            let Some(entry) = RuleName::new(name).and_then(|name| self.rules.get_mut(&name))
            else {
                warn!(rule = name, "message registered for a rule that does not exist");
                continue;
            };
            for language in languages {
                entry.messages.insert(language.clone(), resolver.clone());
            }
        }
    }

    /// Names of registered rules without any message, sorted
    ///
    /// Each one is also logged as a warning.
    pub fn rules_without_messages(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = self
            .rules
            .iter()
            .filter(|(_, entry)| entry.messages.is_empty())
            .map(|(name, _)| name.as_str())
            .collect();
        missing.sort_unstable();
        for name in &missing {
            warn!(rule = *name, "no error messages registered for rule");
        }
        missing
    }

    /// Get a rule by name
    pub fn get(&self, name: &str) -> Option<&RegisteredRule> {
        self.rules.get(&RuleName::new(name)?)
    }

    /// A rule together with its registered name
    pub(crate) fn entry(&self, name: &str) -> Option<(&str, &RegisteredRule)> {
        let (name, entry) = self.rules.get_key_value(&RuleName::new(name)?)?;
        Some((name.as_str(), entry))
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(RuleName::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Parse a rule chain against this registry
    pub fn parse_chain<'r>(&'r self, chain: &str) -> Vec<RuleCall<'r>> {
        parser::parse_chain(self, chain)
    }

    /// Get the number of rules in the registry
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RuleContext;
    use crate::rules::{Hint, Outcome};

    fn always_fails(_ctx: &mut RuleContext<'_, '_>) -> Outcome {
        Err(Hint::Invalid)
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.get("required").is_none());
    }

    #[test]
    fn test_register_rejects_bad_names() {
        let mut registry = RuleRegistry::new();
        assert_eq!(
            registry.register("has space", always_fails),
            Err(RegistryError::InvalidName("has space".to_string()))
        );
        assert_eq!(
            registry.register("", always_fails),
            Err(RegistryError::InvalidName(String::new()))
        );
        assert!(registry.register("ok_name", always_fails).is_ok());
        assert_eq!(registry.names(), vec!["ok_name"]);
    }

    #[test]
    fn test_messages_seed_base_language() {
        let mut registry = RuleRegistry::new();
        registry.register("custom", always_fails).unwrap();
        registry.register_messages("en-GB", [("custom", MessageResolver::fixed("gb"))]);

        let entry = registry.get("custom").unwrap();
        assert_eq!(
            entry.message(&LanguageTag::new("en-gb")).map(|m| m.resolve(None)),
            Some("gb")
        );
        assert_eq!(
            entry.message(&LanguageTag::new("en")).map(|m| m.resolve(None)),
            Some("gb")
        );
    }

    #[test]
    fn test_strict_messages_skip_base_language() {
        let mut registry = RuleRegistry::new();
        registry.register("custom", always_fails).unwrap();
        registry.register_messages_strict("pt-BR", [("custom", MessageResolver::fixed("br"))]);

        let entry = registry.get("custom").unwrap();
        assert!(entry.message(&LanguageTag::new("pt-br")).is_some());
        assert!(entry.message(&LanguageTag::new("pt")).is_none());
    }

    #[test]
    fn test_reregistering_drops_messages() {
        let mut registry = RuleRegistry::new();
        registry.register("custom", always_fails).unwrap();
        registry.register_messages_strict("nl", [("custom", MessageResolver::fixed("nl"))]);
        assert!(registry.rules_without_messages().is_empty());

        registry.register("custom", always_fails).unwrap();
        assert_eq!(registry.rules_without_messages(), vec!["custom"]);
    }

    #[test]
    fn test_messages_for_unknown_rules_are_skipped() {
        let mut registry = RuleRegistry::new();
        registry.register_messages("en", [("ghost", MessageResolver::fixed("boo"))]);
        assert!(registry.get("ghost").is_none());
    }

    #[test]
    fn test_builtin_rules_all_have_english_messages() {
        let registry = RuleRegistry::with_builtin_rules();
        assert!(registry.len() >= 50);
        assert!(registry.rules_without_messages().is_empty());

        let english = LanguageTag::new("en");
        for name in registry.names() {
            let entry = registry.get(name).unwrap();
            assert!(entry.message(&english).is_some(), "{name} lacks an en message");
            assert_eq!(entry.languages().len(), 3);
        }
    }
}
