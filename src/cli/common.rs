//! Helpers shared across CLI commands

use std::path::Path;

use crate::config::Config;
use crate::error::{ConfigError, DecodeError};
use crate::rules::RuleRegistry;

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INVALID: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_PARSE_ERROR: i32 = 3;

/// Errors raised while running a command
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{file}: invalid JSON: {source}")]
    Json {
        file: String,
        source: serde_json::Error,
    },

    #[error("{file}: {source}")]
    Decode { file: String, source: DecodeError },

    #[error("{file}: {source}")]
    Read { file: String, source: std::io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(ConfigError::Parse(_)) => EXIT_PARSE_ERROR,
            _ => EXIT_ERROR,
        }
    }
}

/// Loads and validates the configuration file at `path`
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file does not exist or cannot be read,
/// `ConfigError::Parse` if it is not valid TOML.
pub(crate) fn load_config(path: &str) -> Result<Config, ConfigError> {
    let config_path = Path::new(path);
    if !config_path.exists() {
        return Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{path} not found. Run 'fieldrules init' to create it."),
        )));
    }

    Config::load(config_path)
}

/// The builtin rules plus the configuration's extra messages
pub(crate) fn build_registry(config: Option<&Config>) -> RuleRegistry {
    let mut registry = RuleRegistry::with_builtin_rules();
    if let Some(config) = config {
        config.register_messages(&mut registry);
    }
    registry
}
