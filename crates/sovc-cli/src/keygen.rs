//! # Keygen Subcommand
//!
//! Writes a fresh 32-byte commitment key as 64 hex characters. The same
//! value is accepted by `--key` and by the API's `SOVC_COMMITMENT_KEY`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use sovc_zkp::CommitmentKey;

/// Arguments for `sovc keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Write the key here instead of stdout. Refuses to overwrite.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let key = CommitmentKey::generate();
    match &args.output {
        Some(path) => {
            write_key(path, &key)?;
            println!("OK: wrote commitment key to {}", path.display());
            println!("  Fingerprint: {}", key.fingerprint());
        }
        None => println!("{}", key.to_hex()),
    }
    Ok(0)
}

fn write_key(path: &Path, key: &CommitmentKey) -> Result<()> {
    if path.exists() {
        bail!("refusing to overwrite existing file: {}", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, format!("{}\n", key.to_hex()))
        .with_context(|| format!("failed to write key: {}", path.display()))
}
