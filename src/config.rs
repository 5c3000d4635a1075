//! Configuration file parsing and record schemas

pub mod fieldrules_toml;
pub mod schema;

pub use fieldrules_toml::{
    Config, FieldConfig, FieldRulesMeta, MessageConfig, OverrideConfig, RecordConfig,
};
pub use schema::{Schema, parse_type};

/// Default configuration file name
pub const CONFIG_FILE: &str = "fieldrules.toml";
