//! Validation results and their formatters (human, JSONL, compat)

pub mod human;
pub mod jsonl;
pub mod report;

pub use human::HumanFormatter;
pub use jsonl::JsonlFormatter;
pub use report::{
    COMPAT_MESSAGE, CUSTOM_RULE, CheckedDocument, CompatErrors, CompatOutput, FieldErrors,
    RuleError, ValidationResult,
};
