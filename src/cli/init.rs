//! Initialize a fieldrules project
//!
//! Writes a starter fieldrules.toml that declares one record and validates.

use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE;

/// Default content for fieldrules.toml
pub const DEFAULT_FIELDRULES_TOML: &str = r#"[fieldrules]
version = "1"

# Record validated at the root of every checked document
root = "Signup"

# Path labels in reports: field | json | form
naming = "json"

# Preferred message languages, most preferred first
languages = ["en"]

[[records.Signup.fields]]
name = "email"
type = "string"
rules = "bail|required|email"

[[records.Signup.fields]]
name = "password"
type = "string"
rules = "required|min:8|confirmed"

[[records.Signup.fields]]
name = "password_confirmation"
type = "string"

[[records.Signup.fields]]
name = "tags"
type = "list<string>"
inner = "filled|max:32"

# Custom messages for the root record
# [[overrides]]
# key = "email.required"
# message = "We need your email address."

# Extra catalog entries
# [messages.nl]
# required = "Het :attribute veld is verplicht."
"#;

/// Error type for init command
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What init did with the configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    Skipped,
    Overwritten,
}

/// Run the init command in the current directory
pub fn run_init(force: bool) -> Result<InitOutcome, InitError> {
    run_init_in(Path::new("."), force)
}

/// Write fieldrules.toml into `dir`
///
/// An existing file is left alone unless `force` is set.
pub fn run_init_in(dir: &Path, force: bool) -> Result<InitOutcome, InitError> {
    let path = dir.join(CONFIG_FILE);

    let outcome = match (path.exists(), force) {
        (true, false) => return Ok(InitOutcome::Skipped),
        (true, true) => InitOutcome::Overwritten,
        (false, _) => InitOutcome::Created,
    };
    fs::write(&path, DEFAULT_FIELDRULES_TOML)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::parse(DEFAULT_FIELDRULES_TOML).expect("starter config should parse");
        assert_eq!(config.fieldrules.root, "Signup");
        assert_eq!(config.records["Signup"].fields.len(), 4);
    }

    #[test]
    fn test_init_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let outcome = run_init_in(temp_dir.path(), false).unwrap();
        assert_eq!(outcome, InitOutcome::Created);

        let content = fs::read_to_string(temp_dir.path().join(CONFIG_FILE)).unwrap();
        assert!(content.contains("[fieldrules]"));
        assert!(content.contains("version = \"1\""));
    }

    #[test]
    fn test_init_skips_existing_file_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "existing content").unwrap();

        let outcome = run_init_in(temp_dir.path(), false).unwrap();
        assert_eq!(outcome, InitOutcome::Skipped);
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing content");
    }

    #[test]
    fn test_init_overwrites_with_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "old content").unwrap();

        let outcome = run_init_in(temp_dir.path(), true).unwrap();
        assert_eq!(outcome, InitOutcome::Overwritten);
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_FIELDRULES_TOML);
    }

    #[test]
    fn test_init_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            run_init_in(&missing, false),
            Err(InitError::Io(_))
        ));
    }
}
