//! # Credit Score Routes
//!
//! Score calculation and persistence for the calling subject.
//!
//! ## Endpoints
//!
//! - `POST /v1/credit/validate`: check factors without scoring.
//! - `POST /v1/credit`: score factors and store a record.
//! - `GET /v1/credit`: the caller's most recent record.
//! - `PUT /v1/credit`: update verification state of one of the caller's records.
//! - `POST /v1/credit/report`: score, issue a claim, store, return the report.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sovc_core::{ScoreRecordId, Timestamp};
use sovc_scoring::{score, validate, CreditFactors, ValidationError};
use sovc_zkp::{Report, VerificationStatus};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::{AppState, ScoreRecord, VerificationMethod};

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Body carrying a factor vector.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FactorsRequest {
    #[schema(value_type = Object)]
    pub credit_factors: CreditFactors,
}

/// Result of factor validation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: Vec<FactorViolation>,
}

/// One violated bound.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FactorViolation {
    /// Wire name of the factor, e.g. `creditUtilization`.
    pub field: String,
    pub message: String,
}

impl From<&ValidationError> for FactorViolation {
    fn from(err: &ValidationError) -> Self {
        Self {
            field: err.field.as_str().to_string(),
            message: err.to_string(),
        }
    }
}

/// Body for `POST /v1/credit`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateScoreRequest {
    #[schema(value_type = Object)]
    pub credit_factors: CreditFactors,
    /// Claim or proof presented with the factors. Marks the record verified.
    #[schema(value_type = Option<Object>)]
    pub zkp_proof: Option<serde_json::Value>,
}

/// Body for `PUT /v1/credit`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateScoreRequest {
    #[schema(value_type = String, format = Uuid)]
    pub credit_score_id: ScoreRecordId,
    pub is_verified: Option<bool>,
    #[schema(value_type = Option<Object>)]
    pub zkp_proof: Option<serde_json::Value>,
}

/// A `null` field counts as absent, so `{"zkp_proof": null}` alone is an
/// empty update.
impl Validate for UpdateScoreRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.is_verified.is_none() && self.zkp_proof.is_none() {
            return Err(AppError::Validation(
                "update must set is_verified or zkp_proof".into(),
            ));
        }
        Ok(())
    }
}

/// Envelope for a single score record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreditScoreResponse {
    pub credit_score: ScoreRecord,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/credit/validate", post(validate_factors))
        .route(
            "/v1/credit",
            post(create_score).get(get_latest_score).put(update_score),
        )
        .route("/v1/credit/report", post(create_report))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/credit/validate
#[utoipa::path(
    post,
    path = "/v1/credit/validate",
    request_body = FactorsRequest,
    responses(
        (status = 200, description = "Validation outcome", body = ValidateResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
    ),
    tag = "credit"
)]
pub async fn validate_factors(
    _caller: CallerIdentity,
    body: Result<Json<FactorsRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, AppError> {
    let req = extract_json(body)?;
    let errors: Vec<FactorViolation> = match validate(&req.credit_factors) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(FactorViolation::from).collect(),
    };
    Ok(Json(ValidateResponse {
        valid: errors.is_empty(),
        errors,
    }))
}

/// POST /v1/credit
///
/// Scores the factors and stores a record for the caller. The record is
/// marked verified exactly when a proof accompanies it.
#[utoipa::path(
    post,
    path = "/v1/credit",
    request_body = CreateScoreRequest,
    responses(
        (status = 200, description = "Score stored", body = CreditScoreResponse),
        (status = 422, description = "Invalid credit factors", body = crate::error::ErrorBody),
    ),
    tag = "credit"
)]
pub async fn create_score(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateScoreRequest>, JsonRejection>,
) -> Result<Json<CreditScoreResponse>, AppError> {
    let req = extract_json(body)?;
    let sovereign_score = score(&req.credit_factors)?;
    let is_verified = req.zkp_proof.is_some();

    let record = state.record_score(
        caller.subject_id,
        sovereign_score,
        req.credit_factors,
        req.zkp_proof,
        is_verified,
    );
    metrics::counter!("scores_calculated_total").increment(1);
    tracing::info!(record_id = %record.id, "credit score stored");

    Ok(Json(CreditScoreResponse {
        credit_score: record,
    }))
}

/// GET /v1/credit
#[utoipa::path(
    get,
    path = "/v1/credit",
    responses(
        (status = 200, description = "Most recent score record", body = CreditScoreResponse),
        (status = 404, description = "No score for caller", body = crate::error::ErrorBody),
    ),
    tag = "credit"
)]
pub async fn get_latest_score(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<CreditScoreResponse>, AppError> {
    state
        .latest_score(&caller.subject_id)
        .map(|record| Json(CreditScoreResponse { credit_score: record }))
        .ok_or_else(|| AppError::NotFound("no credit score found".into()))
}

/// PUT /v1/credit
///
/// Records owned by another subject are reported as missing. Attaching a
/// proof also switches the record's verification method to `zkp`.
#[utoipa::path(
    put,
    path = "/v1/credit",
    request_body = UpdateScoreRequest,
    responses(
        (status = 200, description = "Record updated", body = CreditScoreResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorBody),
        (status = 422, description = "Nothing to update", body = crate::error::ErrorBody),
    ),
    tag = "credit"
)]
pub async fn update_score(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<UpdateScoreRequest>, JsonRejection>,
) -> Result<Json<CreditScoreResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let id = *req.credit_score_id.as_uuid();

    let updated = state
        .scores
        .try_update(&id, |record| {
            if record.subject_id != caller.subject_id {
                return Err(());
            }
            if let Some(is_verified) = req.is_verified {
                record.is_verified = is_verified;
            }
            if let Some(proof) = req.zkp_proof {
                record.zkp_proof = Some(proof);
                record.verification_method = VerificationMethod::Zkp;
            }
            record.updated_at = Timestamp::now();
            Ok(record.clone())
        })
        .and_then(Result::ok)
        .ok_or_else(|| AppError::NotFound(format!("credit score {id}")))?;

    Ok(Json(CreditScoreResponse {
        credit_score: updated,
    }))
}

/// POST /v1/credit/report
///
/// Scores the factors, issues a claim under the configured commitment
/// scheme, stores the record with the claim attached, and returns the
/// report.
#[utoipa::path(
    post,
    path = "/v1/credit/report",
    request_body = FactorsRequest,
    responses(
        (status = 200, description = "Report issued", body = serde_json::Value),
        (status = 422, description = "Invalid credit factors", body = crate::error::ErrorBody),
    ),
    tag = "credit"
)]
pub async fn create_report(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<FactorsRequest>, JsonRejection>,
) -> Result<Json<Report>, AppError> {
    let req = extract_json(body)?;
    let sovereign_score = score(&req.credit_factors)?;
    let report = state
        .issuer
        .build_report(&caller.subject_id, sovereign_score, &req.credit_factors)?;

    let claim = serde_json::to_value(&report.claim)
        .map_err(|e| AppError::Internal(format!("claim serialization failed: {e}")))?;
    let record = state.record_score(
        caller.subject_id,
        sovereign_score,
        req.credit_factors,
        Some(claim),
        report.verification_status == VerificationStatus::Verified,
    );
    metrics::counter!("reports_issued_total").increment(1);
    tracing::info!(
        record_id = %record.id,
        report_id = %report.report_id,
        scheme = %state.issuer.scheme_kind(),
        "credit report issued"
    );

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(body: serde_json::Value) -> UpdateScoreRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn null_proof_is_an_empty_update() {
        let id = uuid::Uuid::new_v4();
        let req = update(serde_json::json!({ "credit_score_id": id, "zkp_proof": null }));
        assert!(req.zkp_proof.is_none());
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn either_field_makes_a_valid_update() {
        let id = uuid::Uuid::new_v4();
        assert!(update(serde_json::json!({ "credit_score_id": id, "is_verified": false }))
            .validate()
            .is_ok());
        assert!(update(serde_json::json!({ "credit_score_id": id, "zkp_proof": {} }))
            .validate()
            .is_ok());
    }
}
