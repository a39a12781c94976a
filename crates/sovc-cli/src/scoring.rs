//! # Validate and Score Subcommands

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use sovc_scoring::{score_breakdown, validate, ScoreBreakdown, ScoringError, SovereignScore};

use crate::input::read_factors;

/// Arguments for `sovc validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Factor file (JSON or YAML).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for `sovc score`.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Factor file (JSON or YAML).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Print each band's contribution.
    #[arg(long)]
    pub explain: bool,
}

pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let factors = read_factors(&args.file)?;
    match validate(&factors) {
        Ok(()) => {
            println!("OK: {}", args.file.display());
            Ok(0)
        }
        Err(errors) => {
            println!("FAIL: {} ({} violation(s))", args.file.display(), errors.len());
            for err in &errors {
                println!("  - {err}");
            }
            Ok(1)
        }
    }
}

pub fn run_score(args: &ScoreArgs) -> Result<u8> {
    let factors = read_factors(&args.file)?;
    match score_breakdown(&factors) {
        Ok(breakdown) => {
            if args.explain {
                print!("{}", explain(&breakdown));
            } else {
                println!("{}", breakdown.score);
            }
            Ok(0)
        }
        Err(ScoringError::InvalidFactors(errors)) => {
            eprintln!("cannot score {}:", args.file.display());
            for err in &errors {
                eprintln!("  - {err}");
            }
            Ok(1)
        }
    }
}

/// Render a breakdown as an aligned table ending in the final score.
pub fn explain(b: &ScoreBreakdown) -> String {
    let rows = [
        ("base", SovereignScore::BASE),
        ("payment history", b.payment_history),
        ("credit utilization", b.credit_utilization),
        ("credit age", b.credit_age),
        ("credit mix", b.credit_mix),
        ("new credit", b.new_credit),
    ];
    let mut out = String::new();
    for (label, points) in rows {
        out.push_str(&format!("{label:<20}{points:>6}\n"));
    }
    out.push_str(&format!("{:<20}{:>6}\n", "raw total", b.raw_total));
    if b.raw_total != u32::from(b.score.value()) {
        out.push_str(&format!(
            "{:<20}{:>6}  (clamped to [{}, {}])\n",
            "score",
            b.score.value(),
            SovereignScore::MIN,
            SovereignScore::MAX
        ));
    } else {
        out.push_str(&format!("{:<20}{:>6}\n", "score", b.score.value()));
    }
    out
}
