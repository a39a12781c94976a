//! # Factor Validation
//!
//! [`validate()`] checks every factor bound and returns all violations
//! together. It never panics and never stops at the first failure; the
//! caller decides whether violations block scoring.
//!
//! | Field | Rule |
//! |---|---|
//! | `paymentHistory` (fraction) | `0 <= x <= 1` |
//! | `paymentHistory` (category) | always valid |
//! | `creditUtilization` | `0 <= x <= 1` |
//! | `creditAge` | `x >= 0` |
//! | `creditMix` | `x >= 0` |
//! | `newCredit` | `x >= 0` |
//!
//! NaN fails every rule it is checked against.

use serde::Serialize;
use thiserror::Error;

use crate::factors::{CreditFactors, PaymentHistory};

/// The factor a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FactorField {
    PaymentHistory,
    CreditUtilization,
    CreditAge,
    CreditMix,
    NewCredit,
}

impl FactorField {
    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentHistory => "paymentHistory",
            Self::CreditUtilization => "creditUtilization",
            Self::CreditAge => "creditAge",
            Self::CreditMix => "creditMix",
            Self::NewCredit => "newCredit",
        }
    }
}

impl std::fmt::Display for FactorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The bound a value failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    /// Closed interval `[0, 1]`.
    UnitInterval,
    /// `>= 0`.
    NonNegative,
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnitInterval => f.write_str("must be between 0 and 1"),
            Self::NonNegative => f.write_str("must be non-negative"),
        }
    }
}

/// One violated factor bound.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{field} {bound} (got {actual})")]
pub struct ValidationError {
    /// The offending field.
    pub field: FactorField,
    /// The bound it failed.
    pub bound: Bound,
    /// The rejected value, rendered for humans.
    pub actual: String,
}

impl ValidationError {
    fn new(field: FactorField, bound: Bound, actual: impl ToString) -> Self {
        Self {
            field,
            bound,
            actual: actual.to_string(),
        }
    }
}

/// Check every factor bound, collecting all violations.
pub fn validate(factors: &CreditFactors) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let PaymentHistory::Fraction(v) = factors.payment_history {
        if !in_unit_interval(v) {
            errors.push(ValidationError::new(
                FactorField::PaymentHistory,
                Bound::UnitInterval,
                v,
            ));
        }
    }

    if !in_unit_interval(factors.credit_utilization) {
        errors.push(ValidationError::new(
            FactorField::CreditUtilization,
            Bound::UnitInterval,
            factors.credit_utilization,
        ));
    }

    // `!(x >= 0.0)` rather than `x < 0.0` so that NaN is rejected.
    if !(factors.credit_age >= 0.0) {
        errors.push(ValidationError::new(
            FactorField::CreditAge,
            Bound::NonNegative,
            factors.credit_age,
        ));
    }

    if factors.credit_mix < 0 {
        errors.push(ValidationError::new(
            FactorField::CreditMix,
            Bound::NonNegative,
            factors.credit_mix,
        ));
    }

    if factors.new_credit < 0 {
        errors.push(ValidationError::new(
            FactorField::NewCredit,
            Bound::NonNegative,
            factors.new_credit,
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn in_unit_interval(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}
