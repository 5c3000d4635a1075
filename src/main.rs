//! fieldrules CLI entry point

use clap::Parser;
use fieldrules::cli::check::{CheckOptions, run_check};
use fieldrules::cli::common::{EXIT_ERROR, EXIT_SUCCESS};
use fieldrules::cli::init::{InitOutcome, run_init};
use fieldrules::cli::list::run_list;
use fieldrules::cli::{Command, args::Cli};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::Init { force } => match run_init(force) {
            Ok(InitOutcome::Skipped) => {
                eprintln!("fieldrules.toml already exists. Use --force to overwrite it.");
                EXIT_SUCCESS
            }
            Ok(_) => {
                println!("Created fieldrules.toml. Declare your records to start checking.");
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        },
        Command::Check {
            files,
            config,
            naming,
            languages,
            format,
        } => run_check(&CheckOptions {
            files: &files,
            config: &config,
            naming,
            languages: &languages,
            format,
            color: cli.color,
        }),
        Command::List { config, format } => run_list(&config, format, cli.color),
    };

    process::exit(exit_code);
}
