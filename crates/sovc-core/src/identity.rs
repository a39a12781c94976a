//! # Identifier Newtypes
//!
//! Newtype wrappers for the identifiers that flow through scoring and claim
//! issuance. You cannot pass a `ClaimId` where a `SubjectId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IdentifierError;
use crate::temporal::Timestamp;

/// Maximum accepted subject identifier length.
pub const MAX_SUBJECT_ID_LEN: usize = 128;

/// The subject a score is computed for (an account or user identifier).
///
/// Accepted characters: ASCII alphanumerics and `- _ . @`. Colons are
/// excluded because bearer tokens use `{subject}:{secret}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    /// Validate and wrap a subject identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        let kind = "subject id";
        if value.trim().is_empty() {
            return Err(IdentifierError::Empty { kind });
        }
        let len = value.chars().count();
        if len > MAX_SUBJECT_ID_LEN {
            return Err(IdentifierError::TooLong {
                kind,
                max: MAX_SUBJECT_ID_LEN,
                len,
            });
        }
        if let Some(ch) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@')))
        {
            return Err(IdentifierError::InvalidCharacter { kind, ch });
        }
        Ok(Self(value))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubjectId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for String {
    fn from(id: SubjectId) -> Self {
        id.0
    }
}

impl std::str::FromStr for SubjectId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an issued claim.
///
/// Format: `claim_<subject>_<epoch_millis>_<32 hex chars>`. The suffix is a
/// v4 UUID (122 random bits), so uniqueness is probabilistic: two issuances
/// collide only if they share subject, millisecond and random suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(String);

impl ClaimId {
    /// Generate a fresh claim identifier for `subject` at `issued_at`.
    pub fn generate(subject: &SubjectId, issued_at: Timestamp) -> Self {
        Self(format!(
            "claim_{}_{}_{}",
            subject,
            issued_at.epoch_millis(),
            Uuid::new_v4().simple()
        ))
    }

    /// Wrap an existing identifier string (e.g., read back from a claim).
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a privacy-preserving credit report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    /// Generate a report identifier: `report_<subject>_<epoch_millis>_<8 hex>`.
    pub fn generate(subject: &SubjectId, at: Timestamp) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "report_{}_{}_{}",
            subject,
            at.epoch_millis(),
            &suffix[..8]
        ))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a persisted score record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreRecordId(
    /// The underlying v4 UUID.
    pub Uuid,
);

impl ScoreRecordId {
    /// Generate a new random record identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ScoreRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ScoreRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
