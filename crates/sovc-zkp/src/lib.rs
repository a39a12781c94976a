//! # sovc-zkp: Score Claims and Commitments
//!
//! Issues self-contained claims that bind a subject, a sovereign score and a
//! commitment to the factor vector behind it, and verifies them.
//!
//! ## Architecture
//!
//! - [`traits::CommitmentScheme`]: sealed trait; only the schemes in this
//!   crate can produce commitments.
//! - [`keyed::KeyedScheme`]: HMAC-SHA256 over the canonical factors and a
//!   fresh 32-byte salt, plus a witness tag binding the public fields. The
//!   default scheme.
//! - [`transparent::TransparentScheme`]: base64 of the canonical factors.
//!   Fully reversible (see [`transparent::reveal`]); kept for interop with
//!   claims issued by earlier deployments.
//! - [`issuer::ClaimIssuer`]: produces [`claim::Claim`]s and
//!   [`report::Report`]s.
//! - [`verifier`]: structural verification. Never panics, never touches a
//!   key.
//! - [`keyed::KeyedVerifier`]: MAC binding check for keyed claims.
//! - [`policy::ProofPolicy`]: production mode rejects transparent claims.
//!
//! ## Security Level
//!
//! None of this is zero-knowledge. Keyed commitments hide the factors from
//! anyone without the server key; anyone holding the key can both verify and
//! forge. Structural verification alone proves nothing about the factors.

pub mod claim;
pub mod issuer;
pub mod keyed;
pub mod policy;
mod random;
pub mod report;
pub mod traits;
pub mod transparent;
pub mod verifier;

pub use claim::{Claim, PublicFields, VerifierKeyMaterial};
pub use issuer::{ClaimIssuer, IssueError};
pub use keyed::{CommitmentKey, KeyError, KeyedScheme, KeyedVerifier};
pub use policy::{PolicyError, PolicyMode, ProofPolicy};
pub use report::{
    Report, ReportVerification, UnknownReportVerificationError, VerificationStatus,
    PRIVACY_FEATURES,
};
pub use traits::{CommitmentScheme, Opening, SchemeKind, UnknownSchemeError};
pub use transparent::{reveal, TransparentScheme};
pub use verifier::{check_json, verify, verify_json, MalformedClaim};
