//! # sovc CLI entry point
//!
//! Parses arguments, sets up logging from the `-v` count, and dispatches to
//! the subcommand handlers in `sovc_cli`.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sovc_cli::claim::{run_issue, run_report, run_verify, IssueArgs, ReportArgs, VerifyArgs};
use sovc_cli::keygen::{run_keygen, KeygenArgs};
use sovc_cli::scoring::{run_score, run_validate, ScoreArgs, ValidateArgs};

/// Sovereign credit scoring toolkit.
///
/// Scores five-factor credit vectors, issues and verifies score claims, and
/// manages commitment keys.
#[derive(Parser, Debug)]
#[command(name = "sovc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a factor file against every bound.
    Validate(ValidateArgs),

    /// Compute the sovereign score of a factor file.
    Score(ScoreArgs),

    /// Score a factor file and issue a claim for a subject.
    Issue(IssueArgs),

    /// Verify a claim file.
    Verify(VerifyArgs),

    /// Score a factor file and print a privacy-preserving report.
    Report(ReportArgs),

    /// Generate a commitment key.
    Keygen(KeygenArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Score(args) => run_score(args),
        Commands::Issue(args) => run_issue(args),
        Commands::Verify(args) => run_verify(args),
        Commands::Report(args) => run_report(args),
        Commands::Keygen(args) => run_keygen(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
