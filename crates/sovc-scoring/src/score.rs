//! # Sovereign Score
//!
//! `score = clamp(300 + Σ band points, 300, 1000)`.
//!
//! The raw sum ranges from 560 (every floor) to 1300 (every top tier), so
//! in practice only the upper clamp ever fires. Both clamps are applied
//! regardless; an unrated categorical payment history can pull the raw sum
//! down to 510, which is still above the lower bound.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bands::{
    payment_category_points, CREDIT_AGE, CREDIT_MIX, CREDIT_UTILIZATION, NEW_CREDIT,
    PAYMENT_HISTORY,
};
use crate::factors::{CreditFactors, PaymentHistory};
use crate::validation::{validate, ValidationError};

/// Errors from the scorer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// The factor vector failed validation; every violation is carried.
    #[error("invalid credit factors: {}", join_errors(.0))]
    InvalidFactors(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A value outside `[300, 1000]` was offered as a score.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("score {0} is outside [{min}, {max}]", min = SovereignScore::MIN, max = SovereignScore::MAX)]
pub struct ScoreRangeError(pub i64);

/// An integer credit score in `[300, 1000]`.
///
/// Construction outside the range is impossible, including through serde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct SovereignScore(u16);

impl SovereignScore {
    /// Lowest attainable score.
    pub const MIN: u16 = 300;
    /// Highest attainable score.
    pub const MAX: u16 = 1000;
    /// Points every vector starts with.
    pub const BASE: u32 = 300;

    /// Wrap `value` if it lies within `[MIN, MAX]`.
    pub fn new(value: i64) -> Result<Self, ScoreRangeError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u16))
        } else {
            Err(ScoreRangeError(value))
        }
    }

    /// Clamp a raw point total into range.
    fn clamped(raw: u32) -> Self {
        let bounded = raw.clamp(u32::from(Self::MIN), u32::from(Self::MAX));
        Self(bounded as u16)
    }

    /// The score as an integer.
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl TryFrom<i64> for SovereignScore {
    type Error = ScoreRangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SovereignScore> for u16 {
    fn from(score: SovereignScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for SovereignScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-factor points behind a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub payment_history: u32,
    pub credit_utilization: u32,
    pub credit_age: u32,
    pub credit_mix: u32,
    pub new_credit: u32,
    /// Base plus all contributions, before clamping.
    pub raw_total: u32,
    /// The clamped score.
    pub score: SovereignScore,
}

/// Score a factor vector.
///
/// Works for both fractional and categorical payment history; see
/// [`CreditFactors::fractional`] and [`CreditFactors::categorical`].
///
/// # Errors
///
/// Returns [`ScoringError::InvalidFactors`] with every violation if the
/// vector fails [`validate()`].
pub fn score(factors: &CreditFactors) -> Result<SovereignScore, ScoringError> {
    score_breakdown(factors).map(|b| b.score)
}

/// Score a factor vector and report each band contribution.
pub fn score_breakdown(factors: &CreditFactors) -> Result<ScoreBreakdown, ScoringError> {
    validate(factors).map_err(ScoringError::InvalidFactors)?;

    let payment_history = match factors.payment_history {
        PaymentHistory::Fraction(v) => PAYMENT_HISTORY.points(v),
        PaymentHistory::Category(c) => payment_category_points(c),
    };
    let credit_utilization = CREDIT_UTILIZATION.points(factors.credit_utilization);
    let credit_age = CREDIT_AGE.points(factors.credit_age);
    let credit_mix = CREDIT_MIX.points(factors.credit_mix as f64);
    let new_credit = NEW_CREDIT.points(factors.new_credit as f64);

    let raw_total = SovereignScore::BASE
        + payment_history
        + credit_utilization
        + credit_age
        + credit_mix
        + new_credit;
    let score = SovereignScore::clamped(raw_total);

    tracing::debug!(raw_total, score = score.value(), "computed sovereign score");

    Ok(ScoreBreakdown {
        payment_history,
        credit_utilization,
        credit_age,
        credit_mix,
        new_credit,
        raw_total,
        score,
    })
}
