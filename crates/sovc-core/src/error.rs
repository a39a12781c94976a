//! # Error Hierarchy
//!
//! Structured error types shared by the workspace, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.

use thiserror::Error;

/// Top-level error type for core primitives.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failure during commitment or digest computation.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Identifier validation failure.
    #[error("identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    /// Timestamp could not be parsed or is out of range.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Fractions must be rendered as decimal strings first.
    #[error("float values are not permitted in canonical representations; render fractions as strings: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed during canonicalization.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Validation errors for identifier newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The identifier is empty or whitespace only.
    #[error("{kind} must not be empty")]
    Empty {
        /// Which identifier kind was rejected.
        kind: &'static str,
    },

    /// The identifier exceeds the maximum accepted length.
    #[error("{kind} exceeds {max} characters (got {len})")]
    TooLong {
        /// Which identifier kind was rejected.
        kind: &'static str,
        /// Maximum accepted length.
        max: usize,
        /// Actual length.
        len: usize,
    },

    /// The identifier contains a character outside the accepted set.
    #[error("{kind} contains invalid character {ch:?}")]
    InvalidCharacter {
        /// Which identifier kind was rejected.
        kind: &'static str,
        /// The offending character.
        ch: char,
    },
}
