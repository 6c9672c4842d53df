//! ght - GitHub automation readiness toolkit
//!
//! Diagnoses the local or CI environment, detects the GitHub server flavour,
//! analyzes which PAT permissions a repository's automation needs, and
//! reports on repository security settings.

use clap::Parser;

mod commands;

use commands::Cli;

fn main() {
    ght_core::logging::init();
    let cli = Cli::parse();

    match cli.execute() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
