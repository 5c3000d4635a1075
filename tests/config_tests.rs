//! Integration tests for configuration-driven validation
//!
//! Records declared in fieldrules.toml are built into shapes, documents are
//! decoded against them and validated with the configured overrides,
//! messages, naming and languages.

mod common;

use common::{SIGNUP_CONFIG, TestResult, messages, paths, write_file};
use fieldrules::config::{Config, MessageConfig};
use fieldrules::{ConfigError, DecodeError, Hint, NamingStyle, RuleRegistry, Validator, Value};
use serde_json::json;
use tempfile::TempDir;

const CATALOG_CONFIG: &str = r#"
[fieldrules]
version = "1"
root = "Catalog"
naming = "form"
languages = ["nl-be"]

[[records.Catalog.fields]]
name = "title"
type = "string"
rules = "required|max:10"
form = "catalog_title"

[[records.Catalog.fields]]
name = "root"
type = "optional<Category>"
rules = "not_nil"

[[records.Category.fields]]
name = "name"
type = "string"
rules = "required"

[[records.Category.fields]]
name = "labels"
type = "map<string, string>"

[[records.Category.fields]]
name = "children"
type = "list<Category>"

[[overrides]]
key = "root.children.name"
message = { fallback = "Unnamed category.", hints = { required = "Every subcategory needs a name." } }

[messages.nl]
required = "Het veld :attribute is verplicht."
"#;

fn validate(config: &Config, document: serde_json::Value) -> Result<(), fieldrules::ValidationResult> {
    let mut registry = RuleRegistry::with_builtin_rules();
    config.register_messages(&mut registry);

    let shape = config.root_shape().unwrap();
    let value = Value::from_json(&shape, &document).unwrap();
    Validator::new(&registry)
        .languages(config.fieldrules.languages.clone())
        .naming(config.fieldrules.naming)
        .validate_value(&shape, &value, || config.custom_messages())
}

#[test]
fn test_load_from_file() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_file(dir.path(), "fieldrules.toml", SIGNUP_CONFIG);

    let config = Config::load(&path)?;
    assert_eq!(config.fieldrules.root, "Signup");
    assert_eq!(config.fieldrules.naming, NamingStyle::Json);
    assert_eq!(config.records["Signup"].fields.len(), 4);
    Ok(())
}

#[test]
fn test_load_missing_file() {
    let result = Config::load("/nonexistent/fieldrules.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_self_referential_records_validate_recursively() {
    let config = assert_ok!(Config::parse(CATALOG_CONFIG));
    let document = json!({
        "title": "Hardware",
        "root": {
            "name": "All",
            "labels": {"color": "grey"},
            "children": [
                {"name": "Tools", "children": [{"name": ""}]},
                {"name": "Parts"}
            ]
        }
    });

    let result = validate(&config, document).unwrap_err();
    assert_eq!(
        messages(&result),
        vec![(
            "root.children.0.children.0.name".to_string(),
            vec!["Het veld name is verplicht.".to_string()]
        )]
    );
}

#[test]
fn test_configured_override_applies_to_listed_children() {
    let config = assert_ok!(Config::parse(CATALOG_CONFIG));
    let document = json!({
        "title": "Hardware",
        "root": {"name": "All", "children": [{"name": "Tools"}, {}]}
    });

    let result = validate(&config, document).unwrap_err();
    assert_eq!(paths(&result), vec!["root.children.1.name"]);
    assert_eq!(result.to_string(), "Every subcategory needs a name.");
}

#[test]
fn test_form_naming_and_language_fallback() {
    let config = assert_ok!(Config::parse(CATALOG_CONFIG));
    let document = json!({"title": "A title that is too long"});

    let result = validate(&config, document).unwrap_err();
    // nl-be and nl carry no message for max, so the fallback is used
    assert_eq!(
        messages(&result),
        vec![
            (
                "catalog_title".to_string(),
                vec!["The catalog_title field is invalid".to_string()]
            ),
            (
                "root".to_string(),
                vec!["The root field is invalid".to_string()]
            ),
            (
                "root.name".to_string(),
                vec!["Het veld name is verplicht.".to_string()]
            ),
        ]
    );
}

#[test]
fn test_decode_errors_name_the_wire_path() {
    let config = assert_ok!(Config::parse(CATALOG_CONFIG));
    let shape = config.root_shape().unwrap();

    let error = Value::from_json(
        &shape,
        &json!({"root": {"name": "All", "children": [{"name": 7}]}}),
    )
    .unwrap_err();
    assert!(matches!(
        &error,
        DecodeError::TypeMismatch { path, .. } if path == "root.children.0.name"
    ));
}

#[test]
fn test_hinted_message_config() -> TestResult {
    let config = Config::parse(CATALOG_CONFIG)?;
    let MessageConfig::Hinted { fallback, hints } = &config.overrides[0].message else {
        panic!("expected a hinted message");
    };
    assert_eq!(fallback, "Unnamed category.");
    assert_eq!(hints[&Hint::Required], "Every subcategory needs a name.");
    Ok(())
}

#[test]
fn test_unknown_hint_is_rejected() {
    let broken = CATALOG_CONFIG.replace("hints = { required", "hints = { sometimes");
    assert!(Config::parse(&broken).is_err());
}

#[test]
fn test_messages_for_unknown_rules_are_ignored() {
    let config = assert_ok!(Config::parse(&format!(
        "{SIGNUP_CONFIG}\n[messages.en]\nno_such_rule = \"Never shown.\"\n"
    )));
    let mut registry = RuleRegistry::with_builtin_rules();
    let before = registry.len();
    config.register_messages(&mut registry);
    assert_eq!(registry.len(), before);
    assert!(registry.get("no_such_rule").is_none());
}
