//! # Transparent Scheme
//!
//! The commitment is `commit_` followed by standard base64 of the canonical
//! factor bytes, and the witness is base64 of canonical `{nonce, score}`.
//! Both decode back to their inputs; [`reveal`] does exactly that for a
//! commitment.
//!
//! Claims from this scheme pass structural verification and nothing else.
//! A production [`ProofPolicy`](crate::policy::ProofPolicy) rejects them.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use serde_json::Value;

use sovc_core::CanonicalBytes;

use crate::issuer::IssueError;
use crate::traits::{CommitmentScheme, Committed, Opening, SchemeKind, WitnessInput};

/// Prefix of every transparent commitment.
pub const TRANSPARENT_PREFIX: &str = "commit_";

/// Reversible base64 commitments.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransparentScheme;

#[derive(Serialize)]
struct WitnessBody<'a> {
    nonce: &'a str,
    score: u16,
}

impl CommitmentScheme for TransparentScheme {
    fn kind(&self) -> SchemeKind {
        SchemeKind::Transparent
    }

    fn commit(&self, factors: &CanonicalBytes) -> Result<Committed, IssueError> {
        Ok(Committed {
            commitment: format!("{TRANSPARENT_PREFIX}{}", STANDARD.encode(factors.as_bytes())),
            opening: Opening {
                scheme: SchemeKind::Transparent,
                salt: None,
            },
        })
    }

    fn witness(&self, input: &WitnessInput<'_>) -> Result<String, IssueError> {
        let body = CanonicalBytes::new(&WitnessBody {
            nonce: input.nonce,
            score: input.score.value(),
        })?;
        Ok(STANDARD.encode(body.as_bytes()))
    }
}

/// Recover the committed factor JSON from a transparent commitment.
///
/// Returns `None` if the string is not a transparent commitment or does not
/// decode to JSON.
pub fn reveal(commitment: &str) -> Option<Value> {
    let encoded = commitment.strip_prefix(TRANSPARENT_PREFIX)?;
    let raw = STANDARD.decode(encoded).ok()?;
    serde_json::from_slice(&raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sovc_core::{ClaimId, SubjectId};
    use sovc_scoring::{CreditFactors, SovereignScore};

    #[test]
    fn commitment_reveals_canonical_factors() {
        let factors = CreditFactors::fractional(0.92, 0.15, 6.0, 3, 1);
        let committed = TransparentScheme
            .commit(&factors.canonical_bytes().unwrap())
            .unwrap();
        assert!(committed.commitment.starts_with("commit_"));
        assert_eq!(committed.opening.salt, None);

        let revealed = reveal(&committed.commitment).unwrap();
        assert_eq!(revealed["paymentHistory"], "0.92");
        assert_eq!(revealed["creditMix"], 3);
    }

    #[test]
    fn commitment_is_deterministic() {
        let bytes = CreditFactors::fractional(0.5, 0.5, 1.0, 1, 1)
            .canonical_bytes()
            .unwrap();
        let a = TransparentScheme.commit(&bytes).unwrap();
        let b = TransparentScheme.commit(&bytes).unwrap();
        assert_eq!(a.commitment, b.commitment);
    }

    #[test]
    fn witness_decodes_to_score_and_nonce() {
        let subject = SubjectId::new("alice").unwrap();
        let claim_id = ClaimId::from_string("claim_x");
        let w = TransparentScheme
            .witness(&WitnessInput {
                claim_id: &claim_id,
                subject_id: &subject,
                score: SovereignScore::new(720).unwrap(),
                issued_at_epoch_millis: 0,
                commitment: "commit_",
                nonce: "abcd",
            })
            .unwrap();
        let raw = STANDARD.decode(w).unwrap();
        assert_eq!(std::str::from_utf8(&raw).unwrap(), r#"{"nonce":"abcd","score":720}"#);
    }

    #[test]
    fn reveal_rejects_foreign_strings() {
        assert!(reveal("hmac-sha256:00").is_none());
        assert!(reveal("commit_!!!not-base64").is_none());
        assert!(reveal(&format!("commit_{}", STANDARD.encode(b"not json"))).is_none());
    }
}
