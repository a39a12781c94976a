//! # Claim Subcommands
//!
//! `issue`, `verify` and `report`. Issuance uses the keyed scheme unless
//! `--transparent` is given; without `--key` an ephemeral key is generated
//! and the resulting claim cannot be bound later.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use sovc_core::SubjectId;
use sovc_scoring::score;
use sovc_zkp::{
    check_json, Claim, ClaimIssuer, CommitmentKey, KeyedVerifier, ReportVerification, SchemeKind,
};

use crate::input::{read_document, read_factors, read_key};

/// Issuer selection shared by `issue` and `report`.
#[derive(Args, Debug, Default)]
pub struct IssuerArgs {
    /// Commitment key file (hex, see `sovc keygen`).
    #[arg(long, value_name = "FILE", conflicts_with = "transparent")]
    pub key: Option<PathBuf>,
    /// Use the reversible transparent scheme. Production verifiers reject it.
    #[arg(long)]
    pub transparent: bool,
}

/// Arguments for `sovc issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Subject the claim is issued to.
    #[arg(long)]
    pub subject: String,
    /// Factor file (JSON or YAML).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    #[command(flatten)]
    pub issuer: IssuerArgs,
}

/// Arguments for `sovc verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Claim JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Commitment key file; enables the MAC binding check.
    #[arg(long, value_name = "FILE")]
    pub key: Option<PathBuf>,
}

/// Arguments for `sovc report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(long)]
    pub subject: String,
    /// Factor file (JSON or YAML).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Mark the report verified only if its claim passes verification.
    #[arg(long)]
    pub checked: bool,
    #[command(flatten)]
    pub issuer: IssuerArgs,
}

fn build_issuer(args: &IssuerArgs) -> Result<ClaimIssuer> {
    if args.transparent {
        tracing::warn!("transparent scheme: the claim reveals the credit factors");
        return Ok(ClaimIssuer::transparent());
    }
    let key = match &args.key {
        Some(path) => read_key(path)?,
        None => {
            let key = CommitmentKey::generate();
            tracing::warn!(
                fingerprint = %key.fingerprint(),
                "no --key given; using an ephemeral key, the claim binding cannot be checked later"
            );
            key
        }
    };
    Ok(ClaimIssuer::keyed(key))
}

fn parse_subject(raw: &str) -> Result<SubjectId> {
    SubjectId::new(raw).with_context(|| format!("invalid --subject {raw:?}"))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}

pub fn run_issue(args: &IssueArgs) -> Result<u8> {
    let subject = parse_subject(&args.subject)?;
    let factors = read_factors(&args.file)?;
    let s = score(&factors).with_context(|| format!("cannot score {}", args.file.display()))?;
    let claim = build_issuer(&args.issuer)?
        .issue(&subject, s, &factors)
        .context("claim issuance failed")?;
    print_json(&claim)?;
    Ok(0)
}

pub fn run_report(args: &ReportArgs) -> Result<u8> {
    let subject = parse_subject(&args.subject)?;
    let factors = read_factors(&args.file)?;
    let s = score(&factors).with_context(|| format!("cannot score {}", args.file.display()))?;
    let mode = if args.checked {
        ReportVerification::Checked
    } else {
        ReportVerification::Unconditional
    };
    let report = build_issuer(&args.issuer)?
        .with_report_verification(mode)
        .build_report(&subject, s, &factors)
        .context("report assembly failed")?;
    print_json(&report)?;
    Ok(0)
}

/// Outcome of `sovc verify`, separated from printing for tests.
#[derive(Debug, PartialEq, Eq)]
pub enum Verdict {
    Malformed(String),
    WellFormed { binding: Option<bool> },
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::WellFormed { binding: None | Some(true) })
    }
}

/// Check the claim in `path`, binding included when `key` is given.
pub fn check_claim_file(path: &Path, key: Option<CommitmentKey>) -> Result<Verdict> {
    let value: serde_json::Value = read_document(path)?;
    if let Err(reason) = check_json(&value) {
        return Ok(Verdict::Malformed(reason.to_string()));
    }

    let binding = match key {
        None => None,
        Some(key) => {
            let commitment = value
                .get("commitment")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default();
            if SchemeKind::detect(commitment) != Some(SchemeKind::Keyed) {
                bail!("--key given but the claim was not issued under the keyed scheme");
            }
            let claim: Claim = serde_json::from_value(value)
                .context("claim is well-formed but does not match the claim layout")?;
            Some(KeyedVerifier::new(key).verify_binding(&claim))
        }
    };
    Ok(Verdict::WellFormed { binding })
}

pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let key = args.key.as_deref().map(read_key).transpose()?;
    let verdict = check_claim_file(&args.file, key)?;
    match &verdict {
        Verdict::Malformed(reason) => println!("FAIL: {reason}"),
        Verdict::WellFormed { binding: None } => {
            println!("OK: claim is well-formed (binding not checked)")
        }
        Verdict::WellFormed { binding: Some(true) } => println!("OK: claim is well-formed and bound"),
        Verdict::WellFormed { binding: Some(false) } => {
            println!("FAIL: claim binding does not verify under this key")
        }
    }
    Ok(if verdict.passed() { 0 } else { 1 })
}
