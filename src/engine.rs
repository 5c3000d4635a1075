//! Traversal, rule execution and field lookup

pub mod cancel;
pub mod context;
pub mod path_stack;
pub mod resolver;
pub mod validator;
mod walker;

pub use cancel::CancelToken;
pub use context::{PARSED_DATE_KEY, RuleContext, ValidationState};
pub use path_stack::{PathElement, PathStack, Segment};
pub use validator::{Validator, validate_fields, validate_form, validate_json};
pub use walker::MAX_DEPTH;
