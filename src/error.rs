//! Error types for fieldrules
//!
//! Validation failures are not errors in this sense: they are reported through
//! [`crate::output::ValidationResult`]. The types here cover the surrounding
//! machinery (configuration, schemas and input decoding).

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but is not usable
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// Record schema declared in the configuration is invalid
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Rule registration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// Rule names may only contain ASCII letters, digits and underscores
    #[error("Invalid rule name '{0}'")]
    InvalidName(String),
}

/// Errors building record shapes from type expressions
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// Type expression could not be parsed
    #[error("Malformed type expression '{expr}': {message}")]
    Malformed { expr: String, message: String },

    /// A type expression names a record that is not declared
    #[error("Unknown record '{0}'")]
    UnknownRecord(String),

    /// Map keys must be booleans, integers or strings
    #[error("Unsupported map key type in '{0}'")]
    UnsupportedMapKey(String),

    /// The same field name is declared twice on one record
    #[error("Duplicate field '{field}' on record '{record}'")]
    DuplicateField { record: String, field: String },
}

/// Errors decoding an input document against a record shape
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The input value does not match the declared type
    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// An integer does not fit its declared width
    #[error("{path}: number {value} out of range for {expected}")]
    OutOfRange {
        path: String,
        value: String,
        expected: String,
    },

    /// A map key could not be parsed into the declared key type
    #[error("{path}: invalid map key '{key}'")]
    InvalidKey { path: String, key: String },
}

/// Top-level error type for fieldrules
#[derive(Debug, thiserror::Error)]
pub enum FieldRulesError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Schema error
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Rule registration error
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Input document does not fit the schema
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Input document is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
