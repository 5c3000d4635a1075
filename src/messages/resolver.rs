//! Message resolvers and custom-message overrides

use std::collections::HashMap;

use crate::rules::Hint;

/// Template used when no catalog has a message for a failed rule
pub const FALLBACK_MESSAGE: &str = "The :attribute field is invalid";

/// Produces a message template for a failed rule
#[derive(Debug, Clone, PartialEq)]
pub enum MessageResolver {
    /// The same template whatever the hint
    Fixed(String),
    /// A template per hint, with a fallback for unlisted hints
    Hinted {
        fallback: String,
        hints: HashMap<Hint, String>,
    },
}

impl MessageResolver {
    pub fn fixed(template: impl Into<String>) -> Self {
        MessageResolver::Fixed(template.into())
    }

    pub fn hinted<I, S>(fallback: impl Into<String>, hints: I) -> Self
    where
        I: IntoIterator<Item = (Hint, S)>,
        S: Into<String>,
    {
        MessageResolver::Hinted {
            fallback: fallback.into(),
            hints: hints
                .into_iter()
                .map(|(hint, template)| (hint, template.into()))
                .collect(),
        }
    }

    /// The template for `hint`; may be empty
    pub fn resolve(&self, hint: Option<Hint>) -> &str {
        match self {
            MessageResolver::Fixed(template) => template,
            MessageResolver::Hinted { fallback, hints } => hint
                .and_then(|hint| hints.get(&hint))
                .unwrap_or(fallback),
        }
    }
}

/// A message override supplied by the validated record itself
///
/// The key is a dotted path pattern, optionally ending in a rule name, for
/// example `items.*.name.required`.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomMessage {
    key: String,
    resolver: MessageResolver,
}

impl CustomMessage {
    pub fn new(key: impl Into<String>, resolver: MessageResolver) -> Self {
        Self {
            key: key.into(),
            resolver,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn resolver(&self) -> &MessageResolver {
        &self.resolver
    }
}
