//! trustfix CLI - command-line driver for the trustfix library.
//!
//! Provides a simulated acquisition session (scripted collaborators, real
//! state machine and trust engine) and an offline device fingerprint
//! assessment.

use std::process;

use clap::{Parser, Subcommand};
use trustfix::logging::{init_logging, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};

mod commands;
mod sim;

#[derive(Parser)]
#[command(name = "trustfix")]
#[command(version = trustfix::VERSION)]
#[command(about = "Trusted location acquisition - simulation and fingerprint tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scripted acquisition session against simulated collaborators.
    Simulate(commands::simulate::SimulateArgs),
    /// Assess a set of build identity strings for virtualization markers.
    Fingerprint(commands::fingerprint::FingerprintArgs),
}

fn main() {
    let cli = Cli::parse();

    // Logging failures must not take the tool down.
    let _guard = match init_logging(DEFAULT_LOG_DIR, DEFAULT_LOG_FILE) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: could not initialize logging: {err}");
            None
        }
    };

    let result = match cli.command {
        Command::Simulate(args) => commands::simulate::run(&args),
        Command::Fingerprint(args) => commands::fingerprint::run(&args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
