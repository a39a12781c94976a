//! # Claim Issuer
//!
//! `ClaimIssuer` owns one commitment scheme and turns
//! `(subject, score, factors)` into an immutable [`Claim`]. It performs no
//! I/O; the only side inputs are the clock and the OS RNG.

use std::sync::Arc;

use thiserror::Error;

use sovc_core::{CanonicalizationError, ClaimId, SubjectId, Timestamp};
use sovc_scoring::{CreditFactors, SovereignScore};

use crate::claim::{Claim, PublicFields, VerifierKeyMaterial};
use crate::keyed::{CommitmentKey, KeyedScheme};
use crate::random::random_hex;
use crate::report::ReportVerification;
use crate::traits::{CommitmentScheme, Opening, SchemeKind, WitnessInput};
use crate::transparent::TransparentScheme;

/// Errors from claim issuance.
///
/// Unreachable for factor vectors that passed validation: canonicalization
/// only fails on floats, and factors are rendered float-free.
#[derive(Error, Debug)]
pub enum IssueError {
    /// The factor vector or a claim component could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
    /// The HMAC implementation refused the commitment key.
    #[error("commitment key rejected")]
    InvalidKey,
}

/// Issues claims and reports under one commitment scheme.
#[derive(Clone)]
pub struct ClaimIssuer {
    scheme: Arc<dyn CommitmentScheme>,
    pub(crate) report_verification: ReportVerification,
}

impl ClaimIssuer {
    pub fn new(scheme: impl CommitmentScheme + 'static) -> Self {
        Self {
            scheme: Arc::new(scheme),
            report_verification: ReportVerification::default(),
        }
    }

    /// Issuer using [`KeyedScheme`].
    pub fn keyed(key: CommitmentKey) -> Self {
        Self::new(KeyedScheme::new(key))
    }

    /// Issuer using [`TransparentScheme`].
    pub fn transparent() -> Self {
        Self::new(TransparentScheme)
    }

    /// Set how [`build_report`](Self::build_report) fills
    /// `verification_status`.
    pub fn with_report_verification(mut self, mode: ReportVerification) -> Self {
        self.report_verification = mode;
        self
    }

    pub fn scheme_kind(&self) -> SchemeKind {
        self.scheme.kind()
    }

    pub fn report_verification(&self) -> ReportVerification {
        self.report_verification
    }

    /// Issue a claim for `score` over `factors`.
    ///
    /// Two calls with identical arguments yield different `claim_id`s,
    /// witnesses and key material; keyed commitments differ as well.
    pub fn issue(
        &self,
        subject: &SubjectId,
        score: SovereignScore,
        factors: &CreditFactors,
    ) -> Result<Claim, IssueError> {
        self.issue_with_opening(subject, score, factors)
            .map(|(claim, _)| claim)
    }

    /// Issue a claim and also return the private [`Opening`] for its
    /// commitment. The opening belongs to the holder, not the relying party.
    pub fn issue_with_opening(
        &self,
        subject: &SubjectId,
        score: SovereignScore,
        factors: &CreditFactors,
    ) -> Result<(Claim, Opening), IssueError> {
        let issued_at = Timestamp::now();
        let claim_id = ClaimId::generate(subject, issued_at);
        let canonical = factors.canonical_bytes()?;
        let committed = self.scheme.commit(&canonical)?;

        let nonce = random_hex::<16>();
        let witness = self.scheme.witness(&WitnessInput {
            claim_id: &claim_id,
            subject_id: subject,
            score,
            issued_at_epoch_millis: issued_at.epoch_millis(),
            commitment: &committed.commitment,
            nonce: &nonce,
        })?;
        let verifier_key_material = VerifierKeyMaterial::generate().encode()?;

        tracing::debug!(
            claim_id = %claim_id,
            scheme = self.scheme.kind().name(),
            score = score.value(),
            "issued claim"
        );

        let claim = Claim {
            claim_id,
            public_fields: PublicFields {
                score,
                subject_id: subject.clone(),
                issued_at_epoch_millis: issued_at.epoch_millis(),
            },
            commitment: committed.commitment,
            witness,
            verifier_key_material,
        };
        Ok((claim, committed.opening))
    }
}

impl std::fmt::Debug for ClaimIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimIssuer")
            .field("scheme", &self.scheme.kind())
            .field("report_verification", &self.report_verification)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::verify;

    fn alice() -> SubjectId {
        SubjectId::new("alice").unwrap()
    }

    fn factors() -> CreditFactors {
        CreditFactors::fractional(0.92, 0.15, 6.0, 3, 1)
    }

    #[test]
    fn issued_claim_carries_public_fields() {
        let issuer = ClaimIssuer::keyed(CommitmentKey::generate());
        let score = SovereignScore::new(880).unwrap();
        let claim = issuer.issue(&alice(), score, &factors()).unwrap();

        assert_eq!(claim.public_fields.score, score);
        assert_eq!(claim.public_fields.subject_id, alice());
        assert!(claim.claim_id.as_str().starts_with("claim_alice_"));
        assert!(claim
            .claim_id
            .as_str()
            .contains(&claim.public_fields.issued_at_epoch_millis.to_string()));
        assert_eq!(claim.scheme(), Some(SchemeKind::Keyed));
        assert!(verify(Some(&claim)));
    }

    #[test]
    fn identical_inputs_give_distinct_claims() {
        let issuer = ClaimIssuer::transparent();
        let score = SovereignScore::new(700).unwrap();
        let a = issuer.issue(&alice(), score, &factors()).unwrap();
        let b = issuer.issue(&alice(), score, &factors()).unwrap();
        assert_ne!(a.claim_id, b.claim_id);
        assert_ne!(a.witness, b.witness);
        assert_ne!(a.verifier_key_material, b.verifier_key_material);
        // Transparent commitments depend on the factors alone.
        assert_eq!(a.commitment, b.commitment);
    }

    #[test]
    fn opening_matches_scheme() {
        let keyed = ClaimIssuer::keyed(CommitmentKey::generate());
        let (_, opening) = keyed
            .issue_with_opening(&alice(), SovereignScore::new(650).unwrap(), &factors())
            .unwrap();
        assert_eq!(opening.scheme, SchemeKind::Keyed);
        assert_eq!(opening.salt.as_ref().map(String::len), Some(64));

        let transparent = ClaimIssuer::transparent();
        let (_, opening) = transparent
            .issue_with_opening(&alice(), SovereignScore::new(650).unwrap(), &factors())
            .unwrap();
        assert_eq!(opening.salt, None);
    }

    #[test]
    fn debug_does_not_leak_key() {
        let key = CommitmentKey::generate();
        let issuer = ClaimIssuer::keyed(key.clone());
        assert!(!format!("{issuer:?}").contains(&key.to_hex()));
    }
}
