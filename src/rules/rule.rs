#![forbid(unsafe_code)]

//! Core Rule trait and the failure hints rules report

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::engine::RuleContext;

/// Result of running one rule against one field
///
/// `Err` carries the hint that selects a message variant.
pub type Outcome = Result<(), Hint>;

/// Trait that all rules must implement
///
/// Rules are leaf predicates: they inspect the field through the context and
/// decide pass or fail. The trait is `Send + Sync` so a registry can be shared
/// between threads running independent validations.
pub trait Rule: Send + Sync {
    /// Checks the field held by `ctx`
    fn check(&self, ctx: &mut RuleContext<'_, '_>) -> Outcome;
}

impl<F> Rule for F
where
    F: Fn(&mut RuleContext<'_, '_>) -> Outcome + Send + Sync,
{
    fn check(&self, ctx: &mut RuleContext<'_, '_>) -> Outcome {
        self(ctx)
    }
}

macro_rules! hints {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Why a rule failed
        ///
        /// Hints are stable snake_case names; hinted message resolvers pick
        /// their variant by hint.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum Hint {
            $($variant,)*
        }

        impl Hint {
            pub const ALL: &'static [Hint] = &[$(Hint::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Hint::$variant => $name,)*
                }
            }
        }
    };
}

hints! {
    Required => "required",
    Nil => "nil",
    InvalidType => "invalid_type",
    Invalid => "invalid",
    Unacceptable => "unacceptable",
    NotABoolean => "not_a_boolean",
    NotAscii => "not_ascii",
    Protocol => "protocol",
    NotUppercase => "not_uppercase",
    NotLowercase => "not_lowercase",
    Version => "version",
    NotNumeric => "not_numeric",
    Numeric => "numeric",
    String => "string",
    Array => "array",
    File => "file",
    UnsupportedType => "unsupported_type",
    StartsWith => "starts_with",
    EndsWith => "ends_with",
    Json => "json",
    NotString => "not_string",
    Regex => "regex",
    Matched => "matched",
    NotIn => "not_in",
    In => "in",
    Digits => "digits",
    StringWithoutDigits => "string_without_digits",
    Between => "between",
    Min => "min",
    Max => "max",
    After => "after",
    Before => "before",
    InvalidParam => "invalid_param",
    FieldNotInStruct => "field_not_in_struct",
    FieldMissing => "field_missing",
    NotEqual => "not_equal",
    Lt => "lt",
    Gt => "gt",
    Format => "format",
    Extension => "extension",
    Mimetype => "mimetype",
    NoLocalhost => "no_localhost",
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hint::ALL
            .iter()
            .copied()
            .find(|hint| hint.as_str() == s)
            .ok_or_else(|| format!("Unknown hint '{s}'"))
    }
}
