//! # Privacy-Preserving Report
//!
//! A report wraps a freshly issued claim with the score and a fixed list of
//! privacy features. By default `verification_status` is `verified`
//! unconditionally, which is what existing consumers expect. With
//! [`ReportVerification::Checked`] the claim is run through
//! [`verify`](crate::verifier::verify) and the status reflects the result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sovc_core::{ReportId, SubjectId, Timestamp};
use sovc_scoring::{CreditFactors, SovereignScore};

use crate::claim::Claim;
use crate::issuer::{ClaimIssuer, IssueError};
use crate::verifier::verify;

/// Features advertised on every report, in display order.
pub const PRIVACY_FEATURES: [&str; 5] = [
    "Zero-Knowledge Proof verification",
    "Privacy-preserving credit factors",
    "No personal data exposure",
    "Cryptographic commitment to score",
    "Verifiable without revealing inputs",
];

/// Verification state carried by a [`Report`].
///
/// The issuer only ever produces `Verified` or `Failed`; `Pending` marks a
/// report whose claim has not been checked yet and is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Pending,
    Failed,
}

/// How a report's `verification_status` is decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportVerification {
    /// Always `verified`.
    #[default]
    Unconditional,
    /// `verified` iff the embedded claim passes structural verification.
    Checked,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown report verification mode {0:?} (expected \"unconditional\" or \"checked\")")]
pub struct UnknownReportVerificationError(pub String);

impl std::str::FromStr for ReportVerification {
    type Err = UnknownReportVerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unconditional" => Ok(Self::Unconditional),
            "checked" => Ok(Self::Checked),
            _ => Err(UnknownReportVerificationError(s.to_string())),
        }
    }
}

/// A privacy-preserving credit report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub report_id: ReportId,
    pub sovereign_score: SovereignScore,
    pub claim: Claim,
    pub verification_status: VerificationStatus,
    pub privacy_features: Vec<String>,
}

impl ClaimIssuer {
    /// Issue a claim and wrap it in a [`Report`].
    ///
    /// The status policy is the issuer's
    /// [`report_verification`](ClaimIssuer::report_verification) mode.
    pub fn build_report(
        &self,
        subject: &SubjectId,
        score: SovereignScore,
        factors: &CreditFactors,
    ) -> Result<Report, IssueError> {
        let claim = self.issue(subject, score, factors)?;
        let verification_status = match self.report_verification {
            ReportVerification::Unconditional => VerificationStatus::Verified,
            ReportVerification::Checked if verify(Some(&claim)) => VerificationStatus::Verified,
            ReportVerification::Checked => VerificationStatus::Failed,
        };
        Ok(Report {
            report_id: ReportId::generate(subject, Timestamp::now()),
            sovereign_score: score,
            claim,
            verification_status,
            privacy_features: PRIVACY_FEATURES.iter().map(|s| s.to_string()).collect(),
        })
    }
}
