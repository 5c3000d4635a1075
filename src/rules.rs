#![forbid(unsafe_code)]

//! Rule definitions and registry

pub mod builtin;
pub mod dates;
pub mod parser;
pub mod registry;
mod rule;

// Re-export core types
pub use parser::RuleCall;
pub use registry::{RegisteredRule, RuleRegistry};
pub use rule::{Hint, Outcome, Rule};
