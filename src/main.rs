//! Entry point for the translation entry management CLI.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use i18n_entries::cli::{
    self,
    Cli,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Logs go to stderr so command output (e.g. `list`) stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut stderr = std::io::stderr().lock();
            drop(writeln!(stderr, "{err}"));
            ExitCode::FAILURE
        }
    }
}
