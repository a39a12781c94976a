//! # sovc-scoring: Sovereign Credit Scoring
//!
//! Maps a five-factor credit vector to an integer score in `[300, 1000]`.
//!
//! ## Pipeline
//!
//! ```text
//! CreditFactors ──validate──▶ bands ──Σ + 300──▶ clamp(300, 1000) ──▶ SovereignScore
//! ```
//!
//! - [`factors`]: `CreditFactors` and the `PaymentHistory` tagged variant
//!   (fraction or category), plus the canonical form used for commitments.
//! - [`validation`]: collects every bound violation, never fails fast.
//! - [`bands`]: the fixed point tables. Weights are documentary only.
//! - [`score`]: `SovereignScore`, [`score()`](score::score) and
//!   [`score_breakdown()`](score::score_breakdown).
//!
//! Everything here is pure: no I/O, no shared state, no randomness.

pub mod bands;
pub mod factors;
pub mod score;
pub mod validation;

pub use bands::{BandTable, FactorWeights, WEIGHTS};
pub use factors::{CreditFactors, PaymentCategory, PaymentHistory};
pub use score::{score, score_breakdown, ScoreBreakdown, ScoreRangeError, ScoringError, SovereignScore};
pub use validation::{validate, Bound, FactorField, ValidationError};
