//! CLI argument parsing using clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::NamingStyle;

/// Output format for `check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
    /// `{"errors": {...}, "message": ...}` per document
    Compat,
}

/// Output format for `list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Human,
    Jsonl,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect if terminal supports color
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

impl From<ColorChoice> for termcolor::ColorChoice {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => termcolor::ColorChoice::Auto,
            ColorChoice::Always => termcolor::ColorChoice::Always,
            ColorChoice::Never => termcolor::ColorChoice::Never,
        }
    }
}

/// Path label scheme, as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamingArg {
    Field,
    Json,
    Form,
}

impl From<NamingArg> for NamingStyle {
    fn from(naming: NamingArg) -> Self {
        match naming {
            NamingArg::Field => NamingStyle::Field,
            NamingArg::Json => NamingStyle::Json,
            NamingArg::Form => NamingStyle::Form,
        }
    }
}

/// fieldrules CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "fieldrules")]
#[command(about = "Validate JSON documents against declarative field rules")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate JSON documents against the configured root record
    Check {
        /// JSON documents to validate
        #[arg(required = true)]
        files: Vec<String>,

        /// Configuration file
        #[arg(long, default_value = crate::config::CONFIG_FILE)]
        config: String,

        /// Path labels; overrides the configuration
        #[arg(long)]
        naming: Option<NamingArg>,

        /// Preferred message language, repeatable; overrides the configuration
        #[arg(long = "lang")]
        languages: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "human")]
        format: OutputFormat,
    },

    /// Write a starter fieldrules.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List registered rules and the languages carrying their messages
    List {
        /// Configuration file whose extra messages are included, if present
        #[arg(long, default_value = crate::config::CONFIG_FILE)]
        config: String,

        /// Output format
        #[arg(short, long, default_value = "human")]
        format: ListFormat,
    },
}
