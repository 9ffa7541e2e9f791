// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! vcd-netquery CLI
//!
//! Command-line interface for querying organization networks

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vcd_netquery::cli::{Cli, Runner};
use vcd_netquery::LogLevel;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; reports own stdout
    let level: tracing::Level = LogLevel::from_verbosity(cli.verbose).into();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    match Runner::new(cli).run_blocking() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
