//! # File Input
//!
//! Loading factor vectors, claims and commitment keys from disk.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;

use sovc_scoring::CreditFactors;
use sovc_zkp::CommitmentKey;

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Read and deserialize a JSON or YAML document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if is_yaml(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON: {}", path.display()))
    }
}

pub fn read_factors(path: &Path) -> Result<CreditFactors> {
    read_document(path)
}

/// Read a hex-encoded commitment key, as written by `sovc keygen`.
pub fn read_key(path: &Path) -> Result<CommitmentKey> {
    let hex = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read key file: {}", path.display()))?;
    CommitmentKey::from_hex(&hex)
        .with_context(|| format!("invalid commitment key in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sovc_scoring::{PaymentCategory, PaymentHistory};

    #[test]
    fn json_and_yaml_factors() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("f.json");
        std::fs::write(&json_path, r#"{"paymentHistory": 0.9, "creditMix": 2}"#).unwrap();
        let f = read_factors(&json_path).unwrap();
        assert_eq!(f.payment_history, PaymentHistory::Fraction(0.9));
        assert_eq!(f.credit_mix, 2);

        let yaml_path = dir.path().join("f.yaml");
        std::fs::write(&yaml_path, "paymentHistory: good\ncreditAge: 4.5\n").unwrap();
        let f = read_factors(&yaml_path).unwrap();
        assert_eq!(f.payment_history, PaymentHistory::Category(PaymentCategory::Good));
        assert_eq!(f.credit_age, 4.5);
    }

    #[test]
    fn missing_and_malformed_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_factors(&dir.path().join("absent.json")).is_err());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        let err = read_factors(&bad).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse JSON"));
    }

    #[test]
    fn key_file_accepts_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("k.hex");
        let key = CommitmentKey::generate();
        std::fs::write(&path, format!("{}\n", key.to_hex())).unwrap();
        assert_eq!(read_key(&path).unwrap(), key);

        std::fs::write(&path, "abcd").unwrap();
        assert!(read_key(&path).is_err());
    }
}
