//! # Credit Factor Vector
//!
//! `CreditFactors` is the caller-owned input to scoring and commitment.
//!
//! Payment history arrives in two forms at different call sites: a fraction
//! of on-time payments, or a qualitative category. Both are carried by the
//! [`PaymentHistory`] variant so that a single scoring function and a single
//! set of band tables serve both entry points.
//!
//! JSON field names are camelCase. Missing fields default to zero (and to an
//! unrated payment history), matching what the HTTP intake has always
//! accepted. An explicit `null` payment history is unrated as well. Counts are signed so that negative input reaches the validator
//! instead of failing deserialization.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use sovc_core::{CanonicalBytes, CanonicalizationError};

/// Qualitative payment history.
///
/// Unrecognized labels deserialize to [`PaymentCategory::Unrated`], which
/// contributes no payment points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentCategory {
    Excellent,
    Good,
    Fair,
    Poor,
    /// Any label other than the four above.
    Unrated,
}

impl PaymentCategory {
    /// Parse a label. Only the exact lowercase labels are recognized;
    /// anything else, including `"Excellent"`, is `Unrated`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "excellent" => Self::Excellent,
            "good" => Self::Good,
            "fair" => Self::Fair,
            "poor" => Self::Poor,
            _ => Self::Unrated,
        }
    }

    /// The canonical lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Unrated => "unrated",
        }
    }
}

impl std::fmt::Display for PaymentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// Payment history as either a fraction in `[0, 1]` or a category.
///
/// Untagged on the wire: a JSON number is a fraction, a JSON string is a
/// category label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaymentHistory {
    /// Fraction of on-time payments.
    Fraction(f64),
    /// Qualitative rating.
    Category(PaymentCategory),
}

impl Default for PaymentHistory {
    fn default() -> Self {
        Self::Category(PaymentCategory::Unrated)
    }
}

fn null_as_unrated<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PaymentHistory, D::Error> {
    Ok(Option::<PaymentHistory>::deserialize(deserializer)?.unwrap_or_default())
}

/// The five-factor credit vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreditFactors {
    /// Fraction of on-time payments, or a category.
    #[serde(deserialize_with = "null_as_unrated")]
    pub payment_history: PaymentHistory,
    /// Fraction of available credit in use, `[0, 1]`.
    pub credit_utilization: f64,
    /// Years of credit history, `>= 0`.
    pub credit_age: f64,
    /// Number of distinct credit product types held, `>= 0`.
    pub credit_mix: i64,
    /// Number of recently opened credit lines, `>= 0`.
    pub new_credit: i64,
}

impl CreditFactors {
    /// Factor vector with a fractional payment history.
    pub fn fractional(
        payment_history: f64,
        credit_utilization: f64,
        credit_age: f64,
        credit_mix: i64,
        new_credit: i64,
    ) -> Self {
        Self {
            payment_history: PaymentHistory::Fraction(payment_history),
            credit_utilization,
            credit_age,
            credit_mix,
            new_credit,
        }
    }

    /// Factor vector with a categorical payment history.
    pub fn categorical(
        payment_history: PaymentCategory,
        credit_utilization: f64,
        credit_age: f64,
        credit_mix: i64,
        new_credit: i64,
    ) -> Self {
        Self {
            payment_history: PaymentHistory::Category(payment_history),
            credit_utilization,
            credit_age,
            credit_mix,
            new_credit,
        }
    }

    /// Canonical bytes of this vector, the input to every commitment.
    ///
    /// Reals are rendered with Rust's shortest round-trip decimal form
    /// (`0.92`, `6`), categories by their lowercase label.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(&CanonicalFactors::from(self))
    }
}

/// Float-free mirror of [`CreditFactors`] used for canonicalization.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalFactors {
    payment_history: String,
    credit_utilization: String,
    credit_age: String,
    credit_mix: i64,
    new_credit: i64,
}

impl From<&CreditFactors> for CanonicalFactors {
    fn from(f: &CreditFactors) -> Self {
        let payment_history = match f.payment_history {
            PaymentHistory::Fraction(v) => render_real(v),
            PaymentHistory::Category(c) => c.as_str().to_string(),
        };
        Self {
            payment_history,
            credit_utilization: render_real(f.credit_utilization),
            credit_age: render_real(f.credit_age),
            credit_mix: f.credit_mix,
            new_credit: f.new_credit,
        }
    }
}

fn render_real(v: f64) -> String {
    format!("{v}")
}
