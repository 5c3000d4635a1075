#![forbid(unsafe_code)]

//! fieldrules: declarative, path-aware validation of nested records
//!
//! Fields carry rule chains such as `required|min:3|email`. A [`Validator`]
//! walks a described value, runs every chain against the field it belongs to
//! and reports failures per field path, with messages resolved per language
//! and rendered from templates.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod locator;
pub mod messages;
pub mod model;
pub mod output;
pub mod rules;
pub mod types;

// Re-export error types for convenient access
pub use error::{ConfigError, DecodeError, FieldRulesError, RegistryError, SchemaError};

// Re-export core domain types for convenient access
pub use engine::{
    CancelToken, RuleContext, Validator, validate_fields, validate_form, validate_json,
};
pub use locator::{Conversion, Locator};
pub use messages::{CustomMessage, MessageResolver};
pub use model::{Describe, FieldShape, RecordRef, RecordShape, Shape, Value};
pub use output::{CompatOutput, FieldErrors, RuleError, ValidationResult};
pub use rules::{Hint, Outcome, Rule, RuleRegistry};
pub use types::{LanguageTag, NamingStyle, RuleName};
