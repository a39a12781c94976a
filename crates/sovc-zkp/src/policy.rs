//! # Claim Scheme Policy
//!
//! Decides whether a claim's commitment scheme is acceptable in the current
//! deployment. Transparent commitments reveal the factor vector to anyone
//! who base64-decodes them, so production mode refuses them at every
//! verification endpoint.
//!
//! Without an explicit mode, release builds default to production and debug
//! builds to development. Services parse the mode from their own
//! configuration through [`PolicyMode`]'s `FromStr`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::SchemeKind;

/// Errors from policy enforcement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Non-hiding claim presented in production mode.
    #[error("transparent claim rejected: production mode requires a hiding commitment scheme ({scheme})")]
    TransparentClaimRejected { scheme: String },
    /// The commitment matches no known scheme.
    #[error("unrecognized commitment scheme")]
    UnknownScheme,
    /// A policy mode string that is neither production nor development.
    #[error("unknown proof policy mode {0:?}")]
    UnknownMode(String),
}

/// Policy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Reject transparent claims.
    Production,
    /// Accept every recognized scheme.
    Development,
}

impl std::str::FromStr for PolicyMode {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(PolicyMode::Production),
            "development" | "dev" => Ok(PolicyMode::Development),
            _ => Err(PolicyError::UnknownMode(s.to_string())),
        }
    }
}

impl PolicyMode {
    /// Compile-time default: release = production, debug = development.
    pub fn build_default() -> Self {
        if cfg!(not(debug_assertions)) {
            PolicyMode::Production
        } else {
            PolicyMode::Development
        }
    }
}

/// Scheme acceptance policy for one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofPolicy {
    mode: PolicyMode,
}

impl ProofPolicy {
    /// Policy in the given mode.
    pub fn new(mode: PolicyMode) -> Self {
        Self { mode }
    }

    pub fn production() -> Self {
        Self::new(PolicyMode::Production)
    }

    pub fn development() -> Self {
        Self::new(PolicyMode::Development)
    }

    /// Whether claims committed under `scheme` are acceptable.
    pub fn validate(&self, scheme: SchemeKind) -> Result<(), PolicyError> {
        match self.mode {
            PolicyMode::Production if !scheme.is_hiding() => {
                tracing::warn!(scheme = scheme.name(), "claim rejected by production policy");
                Err(PolicyError::TransparentClaimRejected {
                    scheme: scheme.name().to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// [`validate`](Self::validate) for a raw commitment string.
    ///
    /// Development mode accepts commitments of any shape. Production mode
    /// requires one it can classify as hiding.
    pub fn validate_commitment(&self, commitment: &str) -> Result<(), PolicyError> {
        match (SchemeKind::detect(commitment), self.mode) {
            (Some(scheme), _) => self.validate(scheme),
            (None, PolicyMode::Development) => Ok(()),
            (None, PolicyMode::Production) => {
                tracing::warn!("claim with unrecognized commitment rejected by production policy");
                Err(PolicyError::UnknownScheme)
            }
        }
    }

    pub fn mode(&self) -> PolicyMode {
        self.mode
    }
}

impl Default for ProofPolicy {
    fn default() -> Self {
        Self::new(PolicyMode::build_default())
    }
}
