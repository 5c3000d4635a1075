#![forbid(unsafe_code)]

//! Validation results and the compatibility error shape

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::rules::Hint;
use crate::types::{LanguageTag, NamingStyle};

/// Display text of a result that holds no messages
const EMPTY_RESULT_MESSAGE: &str = "Validation Error";

/// Top-level message of the compatibility shape
pub const COMPAT_MESSAGE: &str = "Form contains errors";

/// Rule name used for errors built by hand
pub const CUSTOM_RULE: &str = "custom";

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleError {
    pub rule: String,
    /// None for errors built by hand
    pub hint: Option<Hint>,
    pub message: String,
}

/// Every failed rule of one field, in chain order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldErrors {
    pub path: String,
    pub errors: Vec<RuleError>,
}

/// Outcome of a failed validation
///
/// Fields appear in traversal order. The type is an [`std::error::Error`]
/// so callers can propagate it with `?`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub naming: NamingStyle,
    pub languages: Vec<LanguageTag>,
    pub errors: Vec<FieldErrors>,
}

impl ValidationResult {
    pub fn new(naming: NamingStyle, languages: Vec<LanguageTag>, errors: Vec<FieldErrors>) -> Self {
        Self {
            naming,
            languages,
            errors,
        }
    }

    /// Builds a result from `path -> message` pairs, sorted by path
    ///
    /// Useful for reporting errors found outside the rule engine, such as a
    /// uniqueness check done by the caller, in the same shape.
    pub fn from_messages<I, K, V>(naming: NamingStyle, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut errors: Vec<FieldErrors> = messages
            .into_iter()
            .map(|(path, message)| FieldErrors {
                path: path.into(),
                errors: vec![RuleError {
                    rule: CUSTOM_RULE.to_string(),
                    hint: None,
                    message: message.into(),
                }],
            })
            .collect();
        errors.sort_by(|a, b| a.path.cmp(&b.path));

        Self::new(naming, Vec::new(), errors)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of failed rules
    pub fn error_count(&self) -> usize {
        self.errors.iter().map(|field| field.errors.len()).sum()
    }

    /// The errors reported at `path`, if any
    pub fn field(&self, path: &str) -> Option<&FieldErrors> {
        self.errors.iter().find(|field| field.path == path)
    }

    pub fn first_message(&self) -> Option<&str> {
        self.errors
            .iter()
            .flat_map(|field| &field.errors)
            .map(|error| error.message.as_str())
            .next()
    }

    /// The `{"errors": {path: [message]}, "message": ...}` shape
    pub fn to_compat(&self) -> CompatOutput {
        CompatOutput {
            errors: CompatErrors(
                self.errors
                    .iter()
                    .map(|field| {
                        (
                            field.path.clone(),
                            field.errors.iter().map(|e| e.message.clone()).collect(),
                        )
                    })
                    .collect(),
            ),
            message: COMPAT_MESSAGE,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.first_message().unwrap_or(EMPTY_RESULT_MESSAGE))
    }
}

impl std::error::Error for ValidationResult {}

/// The outcome of validating one input document
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedDocument {
    /// Where the document came from, usually a file path
    pub source: String,
    /// None when the document passed
    pub result: Option<ValidationResult>,
}

impl CheckedDocument {
    pub fn new(source: impl Into<String>, outcome: Result<(), ValidationResult>) -> Self {
        Self {
            source: source.into(),
            result: outcome.err(),
        }
    }

    pub fn passed(&self) -> bool {
        self.result.as_ref().is_none_or(ValidationResult::is_empty)
    }
}

/// Compatibility error document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatOutput {
    pub errors: CompatErrors,
    pub message: &'static str,
}

/// Path to messages, serialized as an object in traversal order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompatErrors(pub Vec<(String, Vec<String>)>);

impl Serialize for CompatErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (path, messages) in &self.0 {
            map.serialize_entry(path, messages)?;
        }
        map.end()
    }
}
