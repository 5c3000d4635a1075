//! Parsing and validation for fieldrules.toml configuration files

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::schema::Schema;
use crate::error::ConfigError;
use crate::messages::{CustomMessage, MessageResolver};
use crate::model::Shape;
use crate::rules::{Hint, RuleRegistry};
use crate::types::{LanguageTag, NamingStyle, RuleName};

/// Main configuration struct for fieldrules.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Validation settings
    pub fieldrules: FieldRulesMeta,

    /// Record declarations by name
    #[serde(default)]
    pub records: BTreeMap<String, RecordConfig>,

    /// Custom-message overrides for the root record, in priority order
    #[serde(default)]
    pub overrides: Vec<OverrideConfig>,

    /// Extra catalog entries: language, then rule name
    #[serde(default)]
    pub messages: BTreeMap<String, BTreeMap<String, MessageConfig>>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fieldrules.version != "1" {
            return Err(ConfigError::Validation(format!(
                "Unsupported configuration version '{}'. Expected '1'",
                self.fieldrules.version
            )));
        }

        if !self.records.contains_key(&self.fieldrules.root) {
            return Err(ConfigError::Validation(format!(
                "Root record '{}' is not declared under [records]",
                self.fieldrules.root
            )));
        }

        if let Some(language) = self
            .fieldrules
            .languages
            .iter()
            .find(|language| language.as_str().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "Invalid language tag '{language}'"
            )));
        }

        for (position, entry) in self.overrides.iter().enumerate() {
            if entry.key.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Override #{} has an empty key",
                    position + 1
                )));
            }
        }

        for (language, entries) in &self.messages {
            if LanguageTag::new(language.as_str()).as_str().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Invalid language tag '{language}' in [messages]"
                )));
            }
            if let Some(rule) = entries.keys().find(|rule| RuleName::new(rule.as_str()).is_none()) {
                return Err(ConfigError::Validation(format!(
                    "Invalid rule name '{rule}' in [messages.{language}]"
                )));
            }
        }

        self.schema()?;
        Ok(())
    }

    /// Builds the declared records
    pub fn schema(&self) -> Result<Schema, ConfigError> {
        Ok(Schema::build(&self.records)?)
    }

    /// The shape validated at the document root
    pub fn root_shape(&self) -> Result<Shape, ConfigError> {
        let schema = self.schema()?;
        schema.record(&self.fieldrules.root).ok_or_else(|| {
            ConfigError::Validation(format!(
                "Root record '{}' is not declared under [records]",
                self.fieldrules.root
            ))
        })
    }

    /// Overrides in declaration order
    pub fn custom_messages(&self) -> Vec<CustomMessage> {
        self.overrides
            .iter()
            .map(|entry| CustomMessage::new(entry.key.as_str(), entry.message.to_resolver()))
            .collect()
    }

    /// Adds the `[messages]` entries to `registry`
    pub fn register_messages(&self, registry: &mut RuleRegistry) {
        for (language, entries) in &self.messages {
            registry.register_messages(
                language.as_str(),
                entries
                    .iter()
                    .map(|(rule, message)| (rule.as_str(), message.to_resolver())),
            );
        }
    }
}

/// `[fieldrules]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRulesMeta {
    /// Configuration version (must be "1")
    pub version: String,

    /// Record validated at the document root
    pub root: String,

    /// Label scheme for reported paths
    #[serde(default)]
    pub naming: NamingStyle,

    /// Preferred message languages
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageTag>,
}

fn default_languages() -> Vec<LanguageTag> {
    vec![LanguageTag::new(LanguageTag::DEFAULT)]
}

/// One `[records.<Name>]` table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordConfig {
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// One `[[records.<Name>.fields]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,

    /// Type expression, e.g. `list<optional<Item>>`
    #[serde(rename = "type")]
    pub type_expr: String,

    #[serde(default)]
    pub rules: String,

    /// Element rules for list fields
    #[serde(default)]
    pub inner: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
}

/// One `[[overrides]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideConfig {
    /// Dotted path pattern, optionally ending in a rule name
    pub key: String,
    pub message: MessageConfig,
}

/// A message template, optionally varying by failure hint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageConfig {
    Text(String),
    Hinted {
        fallback: String,
        #[serde(default)]
        hints: BTreeMap<Hint, String>,
    },
}

impl MessageConfig {
    pub fn to_resolver(&self) -> MessageResolver {
        match self {
            MessageConfig::Text(template) => MessageResolver::fixed(template.as_str()),
            MessageConfig::Hinted { fallback, hints } => MessageResolver::hinted(
                fallback.as_str(),
                hints.iter().map(|(hint, template)| (*hint, template.as_str())),
            ),
        }
    }
}
