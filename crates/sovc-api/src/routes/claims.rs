//! # Claim Verification Route
//!
//! `POST /v1/claims/verify` accepts any JSON document and runs three checks
//! in order:
//!
//! 1. structural verification ([`sovc_zkp::check_json`]),
//! 2. the configured [`ProofPolicy`](sovc_zkp::ProofPolicy),
//! 3. the MAC binding, for keyed claims when this service holds the key.
//!
//! A claim is valid when it is well-formed, not rejected by policy, and its
//! binding did not fail. Malformed claims are a `200` with `valid: false`,
//! never an error status.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sovc_zkp::{check_json, Claim, SchemeKind};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Outcome of claim verification.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaimVerificationResponse {
    pub valid: bool,
    /// Reason the claim failed structural checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub malformed: Option<String>,
    /// The claim's public fields, echoed back when the claim is well-formed.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub public_fields: Option<serde_json::Value>,
    /// MAC binding result. Absent when no binding check applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding_valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_rejection: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/claims/verify", post(verify_claim))
}

/// POST /v1/claims/verify
#[utoipa::path(
    post,
    path = "/v1/claims/verify",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Verification outcome", body = ClaimVerificationResponse),
        (status = 400, description = "Body is not JSON", body = crate::error::ErrorBody),
    ),
    tag = "claims"
)]
pub async fn verify_claim(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ClaimVerificationResponse>, AppError> {
    let value = extract_json(body)?;
    let response = evaluate(&state, value);
    metrics::counter!(
        "claims_verified_total",
        "valid" => if response.valid { "true" } else { "false" }
    )
    .increment(1);
    Ok(Json(response))
}

fn evaluate(state: &AppState, value: serde_json::Value) -> ClaimVerificationResponse {
    if let Err(reason) = check_json(&value) {
        tracing::warn!(%reason, "claim rejected");
        return ClaimVerificationResponse {
            valid: false,
            malformed: Some(reason.to_string()),
            public_fields: None,
            binding_valid: None,
            policy_rejection: None,
        };
    }

    let public_fields = value.get("public_fields").cloned();
    let commitment = value
        .get("commitment")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();

    let policy_rejection = state
        .policy
        .validate_commitment(commitment)
        .err()
        .map(|e| e.to_string());

    let binding_valid = match (SchemeKind::detect(commitment), &state.keyed_verifier) {
        (Some(SchemeKind::Keyed), Some(verifier)) => Some(
            serde_json::from_value::<Claim>(value)
                .map(|claim| verifier.verify_binding(&claim))
                .unwrap_or(false),
        ),
        _ => None,
    };

    let valid = policy_rejection.is_none() && binding_valid != Some(false);
    if !valid {
        tracing::warn!(?binding_valid, policy_rejected = policy_rejection.is_some(), "claim rejected");
    }

    ClaimVerificationResponse {
        valid,
        malformed: None,
        public_fields,
        binding_valid,
        policy_rejection,
    }
}
