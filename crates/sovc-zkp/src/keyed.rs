//! # Keyed Scheme (HMAC-SHA256)
//!
//! Commitment:
//!
//! ```text
//! hmac-sha256:hex( HMAC(key, "sovc/commitment/v1\0" || salt || canonical(factors)) )
//! ```
//!
//! with a fresh 32-byte salt per claim, returned to the holder as the
//! [`Opening`]. Witness: standard base64 of canonical `{nonce, score, tag}`
//! where
//!
//! ```text
//! tag = hex( HMAC(key, "sovc/witness/v1\0" || canonical({claim_id, commitment,
//!            issued_at_epoch_millis, nonce, score, subject_id})) )
//! ```
//!
//! [`KeyedVerifier::verify_binding`] recomputes the tag, so editing any public
//! field of a keyed claim invalidates it. [`KeyedVerifier::check_opening`]
//! lets a holder prove which factor vector was committed.
//!
//! This is a MAC construction. Whoever holds the key can verify and can also
//! mint claims; there is no zero-knowledge property.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use sovc_core::{decode_hex, to_hex, CanonicalBytes, ContentDigest, DigestAlgorithm};
use sovc_scoring::CreditFactors;

use crate::claim::Claim;
use crate::issuer::IssueError;
use crate::random::random_bytes;
use crate::traits::{CommitmentScheme, Committed, Opening, SchemeKind, WitnessInput};

type HmacSha256 = Hmac<Sha256>;

const COMMITMENT_CONTEXT: &[u8] = b"sovc/commitment/v1\0";
const WITNESS_CONTEXT: &[u8] = b"sovc/witness/v1\0";

/// Length of a commitment key in bytes.
pub const KEY_LEN: usize = 32;

/// Errors parsing a commitment key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The key text is not hex.
    #[error("commitment key is not valid hex")]
    InvalidHex,
    /// The key decodes to the wrong number of bytes.
    #[error("commitment key must be {KEY_LEN} bytes, got {0}")]
    WrongLength(usize),
}

/// A 32-byte server-held HMAC key.
#[derive(Clone, PartialEq, Eq)]
pub struct CommitmentKey([u8; KEY_LEN]);

impl CommitmentKey {
    /// Generate a key from the OS RNG.
    pub fn generate() -> Self {
        Self(random_bytes::<KEY_LEN>())
    }

    /// Key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-char hex key. Surrounding whitespace is ignored, so key
    /// files may end with a newline.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let raw = decode_hex(s.trim()).ok_or(KeyError::InvalidHex)?;
        let len = raw.len();
        let bytes: [u8; KEY_LEN] = raw.try_into().map_err(|_| KeyError::WrongLength(len))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    /// First 8 bytes of SHA-256 over the key, hex. Safe to log.
    pub fn fingerprint(&self) -> String {
        let hash = Sha256::digest(self.0);
        to_hex(&hash[..8])
    }

    fn mac(&self, context: &[u8]) -> Result<HmacSha256, IssueError> {
        let mut mac = HmacSha256::new_from_slice(&self.0).map_err(|_| IssueError::InvalidKey)?;
        mac.update(context);
        Ok(mac)
    }
}

impl std::fmt::Debug for CommitmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CommitmentKey(fp={})", self.fingerprint())
    }
}

#[derive(Serialize, Deserialize)]
struct WitnessBody {
    nonce: String,
    score: u16,
    tag: String,
}

#[derive(Serialize)]
struct BindingPayload<'a> {
    claim_id: &'a str,
    commitment: &'a str,
    issued_at_epoch_millis: i64,
    nonce: &'a str,
    score: u16,
    subject_id: &'a str,
}

fn binding_mac(key: &CommitmentKey, payload: &BindingPayload<'_>) -> Result<HmacSha256, IssueError> {
    let canonical = CanonicalBytes::new(payload)?;
    let mut mac = key.mac(WITNESS_CONTEXT)?;
    mac.update(canonical.as_bytes());
    Ok(mac)
}

fn commitment_mac(
    key: &CommitmentKey,
    salt: &[u8],
    factors: &CanonicalBytes,
) -> Result<HmacSha256, IssueError> {
    let mut mac = key.mac(COMMITMENT_CONTEXT)?;
    mac.update(salt);
    mac.update(factors.as_bytes());
    Ok(mac)
}

/// Keyed HMAC-SHA256 commitments.
#[derive(Debug, Clone)]
pub struct KeyedScheme {
    key: CommitmentKey,
}

impl KeyedScheme {
    /// Scheme committing under `key`.
    pub fn new(key: CommitmentKey) -> Self {
        Self { key }
    }

    /// A verifier sharing this scheme's key.
    pub fn verifier(&self) -> KeyedVerifier {
        KeyedVerifier::new(self.key.clone())
    }
}

impl CommitmentScheme for KeyedScheme {
    fn kind(&self) -> SchemeKind {
        SchemeKind::Keyed
    }

    fn commit(&self, factors: &CanonicalBytes) -> Result<Committed, IssueError> {
        let salt = random_bytes::<32>();
        let out = commitment_mac(&self.key, &salt, factors)?.finalize().into_bytes();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&out);
        let digest = ContentDigest::new(DigestAlgorithm::HmacSha256, bytes);
        Ok(Committed {
            commitment: digest.to_string(),
            opening: Opening {
                scheme: SchemeKind::Keyed,
                salt: Some(to_hex(&salt)),
            },
        })
    }

    fn witness(&self, input: &WitnessInput<'_>) -> Result<String, IssueError> {
        let mac = binding_mac(
            &self.key,
            &BindingPayload {
                claim_id: input.claim_id.as_str(),
                commitment: input.commitment,
                issued_at_epoch_millis: input.issued_at_epoch_millis,
                nonce: input.nonce,
                score: input.score.value(),
                subject_id: input.subject_id.as_str(),
            },
        )?;
        let body = CanonicalBytes::new(&WitnessBody {
            nonce: input.nonce.to_string(),
            score: input.score.value(),
            tag: to_hex(&mac.finalize().into_bytes()),
        })?;
        Ok(STANDARD.encode(body.as_bytes()))
    }
}

/// Checks keyed claims against the server key.
#[derive(Debug, Clone)]
pub struct KeyedVerifier {
    key: CommitmentKey,
}

impl KeyedVerifier {
    pub fn new(key: CommitmentKey) -> Self {
        Self { key }
    }

    /// Whether the witness tag binds the claim's public fields and
    /// commitment under this key.
    ///
    /// `false` for transparent claims, malformed witnesses, or any edit to
    /// `claim_id`, `subject_id`, `score`, `issued_at_epoch_millis` or
    /// `commitment` after issuance. The tag comparison is constant time.
    pub fn verify_binding(&self, claim: &Claim) -> bool {
        if SchemeKind::detect(&claim.commitment) != Some(SchemeKind::Keyed) {
            return false;
        }
        let Some(body) = decode_witness(&claim.witness) else {
            return false;
        };
        if body.score != claim.public_fields.score.value() {
            return false;
        }
        let Some(tag) = decode_hex(&body.tag) else {
            return false;
        };
        let payload = BindingPayload {
            claim_id: claim.claim_id.as_str(),
            commitment: &claim.commitment,
            issued_at_epoch_millis: claim.public_fields.issued_at_epoch_millis,
            nonce: &body.nonce,
            score: body.score,
            subject_id: claim.public_fields.subject_id.as_str(),
        };
        match binding_mac(&self.key, &payload) {
            Ok(mac) => mac.verify_slice(&tag).is_ok(),
            Err(_) => false,
        }
    }

    /// Whether `opening` opens the claim's commitment to `factors`.
    pub fn check_opening(&self, claim: &Claim, factors: &CreditFactors, opening: &Opening) -> bool {
        if opening.scheme != SchemeKind::Keyed {
            return false;
        }
        let Some(committed) = ContentDigest::parse_prefixed(&claim.commitment) else {
            return false;
        };
        if committed.algorithm != DigestAlgorithm::HmacSha256 {
            return false;
        }
        let Some(salt) = opening.salt.as_deref().and_then(decode_hex) else {
            return false;
        };
        let Ok(canonical) = factors.canonical_bytes() else {
            return false;
        };
        match commitment_mac(&self.key, &salt, &canonical) {
            Ok(mac) => mac.verify_slice(&committed.bytes).is_ok(),
            Err(_) => false,
        }
    }
}

fn decode_witness(witness: &str) -> Option<WitnessBody> {
    let raw = STANDARD.decode(witness).ok()?;
    serde_json::from_slice(&raw).ok()
}
