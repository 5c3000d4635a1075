//! Message template scanning and placeholder substitution
//!
//! A placeholder is `:` followed by `[A-Za-z0-9_]+`, and is only recognized
//! at the start of the template or right after whitespace. `a:b` and `::b`
//! contain no placeholders.

use std::ops::Range;

/// Placeholder names a template may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// Label of the field under validation
    Attribute,
    /// The field's own value
    Value,
    /// The value last looked up through the field resolver
    Other,
    /// First rule argument read as a date expression
    Date,
    /// First rule argument
    Arg,
    /// All rule arguments joined with `, `
    Args,
    /// Rule argument by position
    ArgN(usize),
}

impl Placeholder {
    /// Parses a placeholder name without its leading colon
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "attribute" => Some(Placeholder::Attribute),
            "value" => Some(Placeholder::Value),
            "other" => Some(Placeholder::Other),
            "date" => Some(Placeholder::Date),
            "arg" => Some(Placeholder::Arg),
            "args" => Some(Placeholder::Args),
            _ => {
                let digits = name.strip_prefix("arg")?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits.parse().ok().map(Placeholder::ArgN)
            }
        }
    }

    /// Substitution for the argument placeholders; None for the others
    pub fn from_args(self, args: &[String]) -> Option<String> {
        match self {
            Placeholder::Arg => Some(args.first().cloned().unwrap_or_default()),
            Placeholder::Args => Some(args.join(", ")),
            Placeholder::ArgN(index) => Some(args.get(index).cloned().unwrap_or_default()),
            _ => None,
        }
    }
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_name(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Byte ranges of every placeholder token, colon included, left to right
pub fn scan(template: &str) -> Vec<Range<usize>> {
    let bytes = template.as_bytes();
    let mut found = Vec::new();
    let mut idx = 0;
    let mut word_start = true;

    while idx < bytes.len() {
        let byte = bytes[idx];
        idx += 1;

        if is_space(byte) {
            word_start = true;
            continue;
        }
        if !word_start {
            continue;
        }
        word_start = false;

        if byte == b':' {
            let name_start = idx;
            while idx < bytes.len() && is_name(bytes[idx]) {
                idx += 1;
            }
            if idx > name_start {
                found.push(name_start - 1..idx);
            }
        }
    }

    found
}

/// Replaces recognized placeholders, working from the end of the template
///
/// Unknown placeholder names are left as written.
pub fn render<F>(template: &str, mut substitute: F) -> String
where
    F: FnMut(Placeholder) -> String,
{
    let mut rendered = template.to_string();
    for range in scan(template).into_iter().rev() {
        let Some(placeholder) = Placeholder::parse(&template[range.start + 1..range.end]) else {
            continue;
        };
        let replacement = substitute(placeholder);
        rendered.replace_range(range, &replacement);
    }
    rendered
}
