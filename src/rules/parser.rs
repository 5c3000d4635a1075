#![forbid(unsafe_code)]

//! Rule chain parsing
//!
//! A chain looks like `required|min:3|in:a,b,c`. Sections are split on `|`,
//! a section's name and arguments on the first `:`, and the arguments on `,`.

use tracing::warn;

use super::registry::{RegisteredRule, RuleRegistry};

/// One rule of a parsed chain
pub struct RuleCall<'r> {
    pub name: &'r str,
    pub entry: &'r RegisteredRule,
    pub args: Vec<String>,
}

/// Parses `chain`, skipping empty sections and unknown rule names
///
/// Unknown names are logged and dropped; the rest of the chain still runs.
pub fn parse_chain<'r>(registry: &'r RuleRegistry, chain: &str) -> Vec<RuleCall<'r>> {
    let mut calls = Vec::new();

    for section in chain.split('|') {
        if section.is_empty() {
            continue;
        }

        let (name, args) = match section.split_once(':') {
            Some((name, args)) => (name, Some(args)),
            None => (section, None),
        };
        if name.is_empty() {
            continue;
        }

        let Some((name, entry)) = registry.entry(name) else {
            warn!(rule = name, "unknown validation rule");
            continue;
        };

        calls.push(RuleCall {
            name,
            entry,
            args: args
                .map(|args| args.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
        });
    }

    calls
}
