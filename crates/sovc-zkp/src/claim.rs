//! # Claim
//!
//! A claim is the artifact handed to a relying party. All fields are
//! snake_case on the wire:
//!
//! ```json
//! {
//!   "claim_id": "claim_alice_1760000000000_3f2a…",
//!   "public_fields": { "score": 742, "subject_id": "alice", "issued_at_epoch_millis": 1760000000000 },
//!   "commitment": "hmac-sha256:…",
//!   "witness": "eyJub25jZSI6…",
//!   "verifier_key_material": "eyJhbHBoYSI6…"
//! }
//! ```
//!
//! Claims carry no expiry and are never mutated after issuance.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use sovc_core::{CanonicalBytes, CanonicalizationError, ClaimId, SubjectId};
use sovc_scoring::SovereignScore;

use crate::random::random_hex;
use crate::traits::SchemeKind;

/// Fields a relying party may read without any key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicFields {
    pub score: SovereignScore,
    pub subject_id: SubjectId,
    pub issued_at_epoch_millis: i64,
}

/// An issued score claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: ClaimId,
    pub public_fields: PublicFields,
    /// Commitment to the canonical factor vector.
    pub commitment: String,
    /// Derived from the score and a fresh nonce.
    pub witness: String,
    /// Base64 of the canonical [`VerifierKeyMaterial`].
    pub verifier_key_material: String,
}

impl Claim {
    /// The scheme that produced this claim's commitment, if recognizable.
    pub fn scheme(&self) -> Option<SchemeKind> {
        SchemeKind::detect(&self.commitment)
    }
}

/// Fixed five-field key material shape.
///
/// Each field is `<name>_<32 hex chars>` drawn fresh per claim. Nothing is
/// ever verified against these values; relying parties only check that the
/// encoded blob is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierKeyMaterial {
    pub alpha: String,
    pub beta: String,
    pub gamma: String,
    pub delta: String,
    pub gamma_abc: String,
}

impl VerifierKeyMaterial {
    pub fn generate() -> Self {
        Self {
            alpha: format!("alpha_{}", random_hex::<16>()),
            beta: format!("beta_{}", random_hex::<16>()),
            gamma: format!("gamma_{}", random_hex::<16>()),
            delta: format!("delta_{}", random_hex::<16>()),
            gamma_abc: format!("gamma_abc_{}", random_hex::<16>()),
        }
    }

    /// Standard base64 of the canonical JSON form.
    pub fn encode(&self) -> Result<String, CanonicalizationError> {
        Ok(STANDARD.encode(CanonicalBytes::new(self)?.as_bytes()))
    }

    /// Inverse of [`encode`](Self::encode); `None` on any decoding failure.
    pub fn decode(encoded: &str) -> Option<Self> {
        let raw = STANDARD.decode(encoded).ok()?;
        serde_json::from_slice(&raw).ok()
    }
}
