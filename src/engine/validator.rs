#![forbid(unsafe_code)]

//! Validation entry points

use crate::locator::Locator;
use crate::messages::{CustomMessage, normalize_languages};
use crate::model::{Describe, Shape, Value};
use crate::output::ValidationResult;
use crate::rules::RuleRegistry;
use crate::types::{LanguageTag, NamingStyle};

use super::cancel::CancelToken;
use super::walker::Walker;

/// Validates values against the rules declared on their shapes
///
/// A validator borrows a fully populated [`RuleRegistry`] and carries the
/// requester's preferences. It holds no per-call state, so one instance can
/// serve any number of validations.
///
/// ```
/// use fieldrules::{RuleRegistry, Validator, describe_record};
///
/// struct Signup {
///     email: String,
/// }
///
/// describe_record!(Signup {
///     email { rules: "required|email" },
/// });
///
/// let registry = RuleRegistry::with_builtin_rules();
/// let validator = Validator::new(&registry);
/// let result = validator.validate(&Signup { email: String::new() }).unwrap_err();
/// assert_eq!(result.to_string(), "The email field is required.");
/// ```
#[derive(Clone)]
pub struct Validator<'r> {
    registry: &'r RuleRegistry,
    languages: Vec<LanguageTag>,
    naming: NamingStyle,
    cancel: CancelToken,
}

impl<'r> Validator<'r> {
    /// A validator reporting wire names in the default language
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            languages: normalize_languages(Vec::<LanguageTag>::new()),
            naming: NamingStyle::default(),
            cancel: CancelToken::new(),
        }
    }

    /// Preferred message languages, most preferred first
    pub fn languages<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<LanguageTag>,
    {
        self.languages = normalize_languages(tags);
        self
    }

    pub fn naming(mut self, naming: NamingStyle) -> Self {
        self.naming = naming;
        self
    }

    /// Token handed to rules that talk to slow collaborators
    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn registry(&self) -> &'r RuleRegistry {
        self.registry
    }

    pub fn naming_style(&self) -> NamingStyle {
        self.naming
    }

    /// Normalized language list used for message lookup
    pub fn language_list(&self) -> &[LanguageTag] {
        &self.languages
    }

    /// Validates a described value
    ///
    /// # Errors
    ///
    /// Returns the collected field errors when any rule fails.
    pub fn validate<T: Describe>(&self, input: &T) -> Result<(), ValidationResult> {
        let shape = T::shape();
        let value = input.to_value();
        self.validate_value(&shape, &value, || input.custom_messages())
    }

    /// Validates a bound value against an explicit shape
    ///
    /// `overrides` supplies the root's custom messages; it is called at most
    /// once, and only if some rule fails.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors when any rule fails.
    pub fn validate_value<'v, F>(
        &self,
        shape: &'v Shape,
        value: &'v Value,
        overrides: F,
    ) -> Result<(), ValidationResult>
    where
        F: FnOnce() -> Vec<CustomMessage> + 'v,
    {
        let walker = Walker::new(
            self.registry,
            Locator::Bound(shape, value),
            self.naming,
            &self.languages,
            &self.cancel,
            overrides,
        );
        let errors = walker.run();
        if errors.is_empty() {
            return Ok(());
        }
        Err(ValidationResult::new(
            self.naming,
            self.languages.clone(),
            errors,
        ))
    }
}

/// Validates `input` reporting machine field names
///
/// # Errors
///
/// Returns the collected field errors when any rule fails.
pub fn validate_fields<T, I, L>(
    registry: &RuleRegistry,
    languages: I,
    input: &T,
) -> Result<(), ValidationResult>
where
    T: Describe,
    I: IntoIterator<Item = L>,
    L: Into<LanguageTag>,
{
    validate_as(registry, languages, input, NamingStyle::Field)
}

/// Validates `input` reporting wire (JSON) names
///
/// # Errors
///
/// Returns the collected field errors when any rule fails.
pub fn validate_json<T, I, L>(
    registry: &RuleRegistry,
    languages: I,
    input: &T,
) -> Result<(), ValidationResult>
where
    T: Describe,
    I: IntoIterator<Item = L>,
    L: Into<LanguageTag>,
{
    validate_as(registry, languages, input, NamingStyle::Json)
}

/// Validates `input` reporting form names
///
/// # Errors
///
/// Returns the collected field errors when any rule fails.
pub fn validate_form<T, I, L>(
    registry: &RuleRegistry,
    languages: I,
    input: &T,
) -> Result<(), ValidationResult>
where
    T: Describe,
    I: IntoIterator<Item = L>,
    L: Into<LanguageTag>,
{
    validate_as(registry, languages, input, NamingStyle::Form)
}

fn validate_as<T, I, L>(
    registry: &RuleRegistry,
    languages: I,
    input: &T,
    naming: NamingStyle,
) -> Result<(), ValidationResult>
where
    T: Describe,
    I: IntoIterator<Item = L>,
    L: Into<LanguageTag>,
{
    Validator::new(registry)
        .languages(languages)
        .naming(naming)
        .validate(input)
}
