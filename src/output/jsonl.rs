#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line in a deterministic order:
//! 1. One error record per failed rule (document order, then traversal order)
//! 2. One status record

use serde::Serialize;

use super::report::CheckedDocument;
use crate::rules::Hint;

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Formats checked documents as JSONL
    pub fn format(&self, documents: &[CheckedDocument]) -> String {
        let mut output = String::new();
        let mut total_errors = 0_u64;

        for document in documents {
            let Some(result) = &document.result else {
                continue;
            };
            for field in &result.errors {
                for error in &field.errors {
                    total_errors += 1;
                    push_line(
                        &mut output,
                        &ErrorRecord {
                            record_type: "error",
                            document: &document.source,
                            path: &field.path,
                            rule: &error.rule,
                            hint: error.hint,
                            message: &error.message,
                        },
                    );
                }
            }
        }

        let documents_invalid = documents.iter().filter(|d| !d.passed()).count() as u64;
        push_line(
            &mut output,
            &StatusRecord {
                record_type: "status",
                passed: documents_invalid == 0,
                documents_checked: documents.len() as u64,
                documents_invalid,
                total_errors,
            },
        );

        output
    }

    /// Formats the registered rules, one record per rule
    pub fn format_rules<'a, I>(&self, rules: I) -> String
    where
        I: IntoIterator<Item = (&'a str, Vec<String>)>,
    {
        let mut output = String::new();
        for (name, languages) in rules {
            push_line(
                &mut output,
                &RuleRecord {
                    record_type: "rule",
                    name,
                    languages,
                },
            );
        }
        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_line<T: Serialize>(output: &mut String, record: &T) {
    if let Ok(json) = serde_json::to_string(record) {
        output.push_str(&json);
        output.push('\n');
    }
}

#[derive(Debug, Serialize)]
struct ErrorRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    document: &'a str,
    path: &'a str,
    rule: &'a str,
    hint: Option<Hint>,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct StatusRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    passed: bool,
    documents_checked: u64,
    documents_invalid: u64,
    total_errors: u64,
}

#[derive(Debug, Serialize)]
struct RuleRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    name: &'a str,
    languages: Vec<String>,
}
