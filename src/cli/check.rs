//! Check command implementation
//!
//! Loads fieldrules.toml, decodes every JSON document against the root
//! record, validates it and reports the outcome in the requested format.

use std::fs;
use std::io::Write;
use termcolor::StandardStream;

use crate::cli::args::{ColorChoice, NamingArg, OutputFormat};
use crate::cli::common::{CliError, EXIT_INVALID, EXIT_SUCCESS, build_registry, load_config};
use crate::engine::Validator;
use crate::model::{Shape, Value};
use crate::output::{CheckedDocument, HumanFormatter, JsonlFormatter};
use crate::types::LanguageTag;

/// Options of one `check` invocation
#[derive(Debug, Clone)]
pub struct CheckOptions<'a> {
    pub files: &'a [String],
    pub config: &'a str,
    pub naming: Option<NamingArg>,
    pub languages: &'a [String],
    pub format: OutputFormat,
    pub color: ColorChoice,
}

/// Run the check command
///
/// Exit code:
/// - 0: every document is valid
/// - 1: at least one document failed validation
/// - 2: configuration, I/O or decode error
/// - 3: invalid TOML configuration
pub fn run_check(options: &CheckOptions<'_>) -> i32 {
    match run_check_inner(options) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_INVALID,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run_check_inner(options: &CheckOptions<'_>) -> Result<bool, CliError> {
    let config = load_config(options.config)?;
    let registry = build_registry(Some(&config));
    let shape = config.root_shape()?;

    let naming = options
        .naming
        .map(Into::into)
        .unwrap_or(config.fieldrules.naming);
    let languages: Vec<LanguageTag> = if options.languages.is_empty() {
        config.fieldrules.languages.clone()
    } else {
        options.languages.iter().map(LanguageTag::new).collect()
    };
    let validator = Validator::new(&registry).languages(languages).naming(naming);
    let overrides = config.custom_messages();

    let mut documents = Vec::with_capacity(options.files.len());
    for file in options.files {
        let value = decode_document(file, &shape)?;
        let outcome = validator.validate_value(&shape, &value, || overrides.clone());
        documents.push(CheckedDocument::new(file.as_str(), outcome));
    }

    match options.format {
        OutputFormat::Human => {
            let mut stdout = StandardStream::stdout(options.color.into());
            HumanFormatter::new().write(&mut stdout, &documents)?;
        }
        OutputFormat::Jsonl => {
            print!("{}", JsonlFormatter::new().format(&documents));
        }
        OutputFormat::Compat => print_compat(&documents)?,
    }

    Ok(documents.iter().all(CheckedDocument::passed))
}

/// Reads `file` and decodes it as a value of `shape`
fn decode_document(file: &str, shape: &Shape) -> Result<Value, CliError> {
    let content = fs::read_to_string(file).map_err(|source| CliError::Read {
        file: file.to_string(),
        source,
    })?;
    let json: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| CliError::Json {
            file: file.to_string(),
            source,
        })?;
    Value::from_json(shape, &json).map_err(|source| CliError::Decode {
        file: file.to_string(),
        source,
    })
}

/// One compatibility object per invalid document, in argument order
fn print_compat(documents: &[CheckedDocument]) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    for result in documents.iter().filter_map(|document| document.result.as_ref()) {
        let line = serde_json::to_string(&result.to_compat()).map_err(std::io::Error::from)?;
        writeln!(stdout, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, DecodeError};
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    const CONFIG: &str = r#"
[fieldrules]
version = "1"
root = "Signup"

[[records.Signup.fields]]
name = "email"
type = "string"
rules = "required|email"
"#;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_decode_document_errors() {
        let config = crate::config::Config::parse(CONFIG).unwrap();
        let shape = config.root_shape().unwrap();

        let not_json = temp_file("{");
        let path = not_json.path().to_str().unwrap();
        assert!(matches!(
            decode_document(path, &shape),
            Err(CliError::Json { .. })
        ));

        let wrong_type = temp_file(r#"{"email": 3}"#);
        let path = wrong_type.path().to_str().unwrap();
        assert!(matches!(
            decode_document(path, &shape),
            Err(CliError::Decode {
                source: DecodeError::TypeMismatch { .. },
                ..
            })
        ));

        assert!(matches!(
            decode_document("/nonexistent/doc.json", &shape),
            Err(CliError::Read { .. })
        ));
    }

    #[test]
    fn test_check_reports_invalid_documents() {
        let config = temp_file(CONFIG);
        let good = temp_file(r#"{"email": "ada@example.com"}"#);
        let bad = temp_file(r#"{"email": ""}"#);
        let files = vec![
            good.path().to_str().unwrap().to_string(),
            bad.path().to_str().unwrap().to_string(),
        ];

        let mut options = CheckOptions {
            files: &files[..1],
            config: config.path().to_str().unwrap(),
            naming: None,
            languages: &[],
            format: OutputFormat::Jsonl,
            color: ColorChoice::Never,
        };
        assert!(run_check_inner(&options).unwrap());

        options.files = &files[..];
        assert!(!run_check_inner(&options).unwrap());
    }

    #[test]
    fn test_check_missing_config() {
        let files = vec!["doc.json".to_string()];
        let options = CheckOptions {
            files: &files,
            config: "/nonexistent/fieldrules.toml",
            naming: None,
            languages: &[],
            format: OutputFormat::Human,
            color: ColorChoice::Never,
        };
        assert!(matches!(
            run_check_inner(&options),
            Err(CliError::Config(ConfigError::Io(_)))
        ));
    }
}
