//! List command implementation
//!
//! Prints every registered rule with the languages that carry a message for
//! it. Extra messages from fieldrules.toml are included when the file exists.

use std::path::Path;
use termcolor::StandardStream;

use crate::cli::args::{ColorChoice, ListFormat};
use crate::cli::common::{CliError, EXIT_SUCCESS, build_registry, load_config};
use crate::output::{HumanFormatter, JsonlFormatter};
use crate::rules::RuleRegistry;

/// Run the list command
///
/// Exit code:
/// - 0: Success
/// - 2: Error
/// - 3: invalid TOML configuration
pub fn run_list(config: &str, format: ListFormat, color: ColorChoice) -> i32 {
    match run_list_inner(config, format, color) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run_list_inner(config: &str, format: ListFormat, color: ColorChoice) -> Result<(), CliError> {
    let config = if Path::new(config).exists() {
        Some(load_config(config)?)
    } else {
        None
    };
    let registry = build_registry(config.as_ref());

    match format {
        ListFormat::Human => {
            let mut stdout = StandardStream::stdout(color.into());
            HumanFormatter::new().write_rules(&mut stdout, rule_languages(&registry))?;
        }
        ListFormat::Jsonl => {
            print!("{}", JsonlFormatter::new().format_rules(rule_languages(&registry)));
        }
    }
    Ok(())
}

/// Rule names, sorted, with the languages that carry their messages
fn rule_languages(registry: &RuleRegistry) -> Vec<(&str, Vec<String>)> {
    registry
        .names()
        .into_iter()
        .map(|name| {
            let languages = registry
                .get(name)
                .map(|entry| {
                    entry
                        .languages()
                        .into_iter()
                        .map(|language| language.to_string())
                        .collect()
                })
                .unwrap_or_default();
            (name, languages)
        })
        .collect()
}
