#![forbid(unsafe_code)]

//! Colored terminal output

use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

use super::report::CheckedDocument;

/// Writes check results for people
pub struct HumanFormatter;

impl HumanFormatter {
    pub fn new() -> Self {
        HumanFormatter
    }

    /// Writes every field error followed by a one-line verdict
    ///
    /// # Errors
    ///
    /// Returns any error raised by the underlying writer.
    pub fn write(&self, out: &mut dyn WriteColor, documents: &[CheckedDocument]) -> io::Result<()> {
        let mut invalid = 0;

        for document in documents {
            let Some(result) = document.result.as_ref().filter(|r| !r.is_empty()) else {
                continue;
            };
            invalid += 1;

            out.set_color(ColorSpec::new().set_bold(true))?;
            writeln!(out, "{}", document.source)?;
            out.reset()?;

            for field in &result.errors {
                for error in &field.errors {
                    write!(out, "  ")?;
                    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
                    write!(out, "{}", field.path)?;
                    out.reset()?;
                    write!(out, " ")?;
                    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
                    write!(out, "[{}]", error.rule)?;
                    out.reset()?;
                    writeln!(out, " {}", error.message)?;
                }
            }
            writeln!(out)?;
        }

        if invalid == 0 {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
            write!(out, "Check PASSED")?;
            out.reset()?;
            writeln!(out, ": {} document(s) valid", documents.len())?;
        } else {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, "Check FAILED")?;
            out.reset()?;
            writeln!(out, ": {invalid} of {} document(s) invalid", documents.len())?;
        }
        Ok(())
    }

    /// Writes the registered rules and the languages carrying their messages
    ///
    /// # Errors
    ///
    /// Returns any error raised by the underlying writer.
    pub fn write_rules<'a, I>(&self, out: &mut dyn WriteColor, rules: I) -> io::Result<()>
    where
        I: IntoIterator<Item = (&'a str, Vec<String>)>,
    {
        let mut count = 0;
        for (name, languages) in rules {
            count += 1;
            out.set_color(ColorSpec::new().set_bold(true))?;
            write!(out, "{name:<18}")?;
            out.reset()?;
            if languages.is_empty() {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
                writeln!(out, " (no messages)")?;
                out.reset()?;
            } else {
                writeln!(out, " {}", languages.join(", "))?;
            }
        }
        writeln!(out)?;
        writeln!(out, "{count} rule(s) registered")
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}
