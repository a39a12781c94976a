//! # Commitment Scheme Trait (Sealed)
//!
//! A scheme turns canonical factor bytes into a commitment string and the
//! claim's public fields into a witness string. The trait is sealed: only
//! the schemes defined in this crate can implement it, so a verifier never
//! meets a commitment format it cannot classify.
//!
//! The scheme that produced a commitment is recoverable from the string
//! itself ([`SchemeKind::detect`]):
//!
//! | Scheme | Commitment format |
//! |---|---|
//! | keyed | `hmac-sha256:<64 hex>` |
//! | transparent | `commit_<base64>` |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sovc_core::{CanonicalBytes, ClaimId, ContentDigest, DigestAlgorithm, SubjectId};
use sovc_scoring::SovereignScore;

use crate::issuer::IssueError;
use crate::transparent::TRANSPARENT_PREFIX;

/// Which scheme produced a commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    /// HMAC-SHA256 under a server key. Hiding and binding against anyone
    /// without the key.
    Keyed,
    /// Base64 of the canonical factors. Neither hiding nor binding.
    Transparent,
}

impl SchemeKind {
    /// Whether commitments of this kind conceal the factor vector.
    pub fn is_hiding(self) -> bool {
        matches!(self, SchemeKind::Keyed)
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            SchemeKind::Keyed => "hmac-sha256",
            SchemeKind::Transparent => "transparent-base64",
        }
    }

    /// Classify a commitment string. `None` for anything neither scheme
    /// would produce.
    pub fn detect(commitment: &str) -> Option<Self> {
        if commitment.starts_with(TRANSPARENT_PREFIX) {
            return Some(SchemeKind::Transparent);
        }
        match ContentDigest::parse_prefixed(commitment) {
            Some(d) if d.algorithm == DigestAlgorithm::HmacSha256 => Some(SchemeKind::Keyed),
            _ => None,
        }
    }
}

impl std::fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemeKind::Keyed => f.write_str("keyed"),
            SchemeKind::Transparent => f.write_str("transparent"),
        }
    }
}

/// An unrecognized scheme name in configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown commitment scheme {0:?} (expected \"keyed\" or \"transparent\")")]
pub struct UnknownSchemeError(pub String);

impl std::str::FromStr for SchemeKind {
    type Err = UnknownSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyed" | "hmac" | "hmac-sha256" => Ok(SchemeKind::Keyed),
            "transparent" => Ok(SchemeKind::Transparent),
            _ => Err(UnknownSchemeError(s.to_string())),
        }
    }
}

/// Private data the holder needs to re-open a commitment later.
///
/// Transparent commitments open themselves, so their salt is `None`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    pub scheme: SchemeKind,
    /// Hex-encoded 32-byte salt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

impl std::fmt::Debug for Opening {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Opening")
            .field("scheme", &self.scheme)
            .field("salt", &self.salt.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A commitment together with its opening.
#[derive(Debug, Clone)]
pub struct Committed {
    pub commitment: String,
    pub opening: Opening,
}

/// The public values a witness is derived from.
#[derive(Debug, Clone, Copy)]
pub struct WitnessInput<'a> {
    pub claim_id: &'a ClaimId,
    pub subject_id: &'a SubjectId,
    pub score: SovereignScore,
    pub issued_at_epoch_millis: i64,
    pub commitment: &'a str,
    pub nonce: &'a str,
}

mod private {
    pub trait Sealed {}
}

/// Sealed interface shared by every commitment scheme.
///
/// `Send + Sync` so one issuer can be shared across request handlers.
pub trait CommitmentScheme: private::Sealed + Send + Sync {
    /// The kind of commitments this scheme produces.
    fn kind(&self) -> SchemeKind;

    /// Commit to canonical factor bytes.
    ///
    /// # Errors
    ///
    /// [`IssueError::InvalidKey`] if the scheme's key is unusable.
    fn commit(&self, factors: &CanonicalBytes) -> Result<Committed, IssueError>;

    /// Derive the witness string for a claim.
    fn witness(&self, input: &WitnessInput<'_>) -> Result<String, IssueError>;
}

impl private::Sealed for crate::keyed::KeyedScheme {}
impl private::Sealed for crate::transparent::TransparentScheme {}
