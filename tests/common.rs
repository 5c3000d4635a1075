//! Test utilities for fieldrules integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use fieldrules::{RuleRegistry, ValidationResult};

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Extract Some value or panic with context
#[macro_export]
macro_rules! assert_some {
    ($expr:expr) => {
        match $expr {
            Some(v) => v,
            None => panic!("assertion failed: expected Some, got None"),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Some(v) => v,
            None => panic!("{}: got None", $msg),
        }
    };
}

/// Registry with every builtin rule and the English catalog
pub fn builtin_registry() -> RuleRegistry {
    RuleRegistry::with_builtin_rules()
}

/// `(path, messages)` pairs of a result, in report order
pub fn messages(result: &ValidationResult) -> Vec<(String, Vec<String>)> {
    result
        .errors
        .iter()
        .map(|field| {
            (
                field.path.clone(),
                field.errors.iter().map(|error| error.message.clone()).collect(),
            )
        })
        .collect()
}

/// Reported paths, in report order
pub fn paths(result: &ValidationResult) -> Vec<&str> {
    result.errors.iter().map(|field| field.path.as_str()).collect()
}

/// Configuration used by the CLI and config tests
pub const SIGNUP_CONFIG: &str = r#"
[fieldrules]
version = "1"
root = "Signup"

[[records.Signup.fields]]
name = "Email"
type = "string"
rules = "bail|required|email"
json = "email"

[[records.Signup.fields]]
name = "Password"
type = "string"
rules = "required|min:8|confirmed"
json = "password"

[[records.Signup.fields]]
name = "Password_confirmation"
type = "string"
json = "password_confirmation"

[[records.Signup.fields]]
name = "Tags"
type = "list<string>"
inner = "filled|max:8"
json = "tags"
"#;

pub const VALID_SIGNUP: &str = r#"{
  "email": "ada@example.com",
  "password": "correct horse",
  "password_confirmation": "correct horse",
  "tags": ["rust"]
}"#;

pub const INVALID_SIGNUP: &str = r#"{
  "email": "not-an-email",
  "password": "short",
  "password_confirmation": "short",
  "tags": ["", "far too long a tag"]
}"#;

/// Writes `contents` to `name` inside `dir` and returns the full path
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
