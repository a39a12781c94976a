//! # Structural Verification
//!
//! A claim is structurally valid iff `claim_id`, `commitment` and
//! `verifier_key_material` are non-empty strings and `public_fields.score`
//! is an integer in `[300, 1000]`. Nothing else is inspected here: no key,
//! no witness, no subject format.
//!
//! Verification never panics. `null`, `{}`, arrays, and objects with
//! missing or mistyped fields all yield `false`.

use serde_json::Value;
use thiserror::Error;

use sovc_scoring::SovereignScore;

use crate::claim::Claim;

/// Why a claim failed structural verification.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedClaim {
    #[error("claim is not a JSON object")]
    NotAnObject,
    #[error("claim_id is missing or empty")]
    MissingClaimId,
    #[error("commitment is missing or empty")]
    MissingCommitment,
    #[error("verifier_key_material is missing or empty")]
    MissingVerifierKeyMaterial,
    #[error("public_fields.score is missing or not an integer")]
    MissingScore,
    #[error("public_fields.score is outside [300, 1000]")]
    ScoreOutOfRange,
}

/// Structural check of a typed claim. `None` is never valid.
pub fn verify(claim: Option<&Claim>) -> bool {
    match claim {
        Some(c) => {
            let ok = !c.claim_id.as_str().is_empty()
                && !c.commitment.is_empty()
                && !c.verifier_key_material.is_empty();
            if !ok {
                tracing::warn!(claim_id = %c.claim_id, "claim rejected: empty required field");
            }
            ok
        }
        None => false,
    }
}

/// Structural check of an untyped claim.
pub fn verify_json(value: &Value) -> bool {
    match check_json(value) {
        Ok(()) => true,
        Err(reason) => {
            tracing::warn!(%reason, "claim rejected");
            false
        }
    }
}

/// Like [`verify_json`], but reports the first defect found.
pub fn check_json(value: &Value) -> Result<(), MalformedClaim> {
    let obj = value.as_object().ok_or(MalformedClaim::NotAnObject)?;

    let non_empty = |key: &str| obj.get(key).and_then(Value::as_str).is_some_and(|s| !s.is_empty());
    if !non_empty("claim_id") {
        return Err(MalformedClaim::MissingClaimId);
    }
    if !non_empty("commitment") {
        return Err(MalformedClaim::MissingCommitment);
    }
    if !non_empty("verifier_key_material") {
        return Err(MalformedClaim::MissingVerifierKeyMaterial);
    }

    let score = obj
        .get("public_fields")
        .and_then(|p| p.get("score"))
        .and_then(Value::as_i64)
        .ok_or(MalformedClaim::MissingScore)?;
    SovereignScore::new(score).map_err(|_| MalformedClaim::ScoreOutOfRange)?;
    Ok(())
}
