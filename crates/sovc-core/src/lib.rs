#![deny(missing_docs)]

//! # sovc-core: Foundational Types for the Sovereign Credit Engine
//!
//! Every other crate in the workspace depends on `sovc-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `SubjectId`, `ClaimId`,
//!    `ReportId`, `ScoreRecordId`; no bare strings cross crate boundaries.
//!
//! 2. **`CanonicalBytes` newtype.** Commitments and MACs are computed over
//!    `CanonicalBytes` only. Floats are rejected, so fractional credit factors
//!    must be rendered as decimal strings before they are committed.
//!
//! 3. **UTC-only timestamps.** `Timestamp` carries millisecond precision
//!    because claims expose `issued_at_epoch_millis`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sovc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{decode_hex, sha256_digest, sha256_hex, to_hex, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, CoreError, IdentifierError};
pub use identity::{ClaimId, ReportId, ScoreRecordId, SubjectId};
pub use temporal::Timestamp;
