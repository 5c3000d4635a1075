//! Error message resolution: resolvers, languages and templates

pub mod catalog;
pub mod language;
pub mod resolver;
pub mod template;

pub use language::normalize_languages;
pub use resolver::{CustomMessage, FALLBACK_MESSAGE, MessageResolver};
pub use template::{Placeholder, render};
