//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sovereign Credit API",
        version = "0.1.0",
        description = "Sovereign credit scoring, score persistence, report issuance and claim verification.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::credit::validate_factors,
        crate::routes::credit::create_score,
        crate::routes::credit::get_latest_score,
        crate::routes::credit::update_score,
        crate::routes::credit::create_report,
        crate::routes::claims::verify_claim,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::state::ScoreRecord,
        crate::state::VerificationMethod,
        crate::routes::credit::FactorsRequest,
        crate::routes::credit::ValidateResponse,
        crate::routes::credit::FactorViolation,
        crate::routes::credit::CreateScoreRequest,
        crate::routes::credit::UpdateScoreRequest,
        crate::routes::credit::CreditScoreResponse,
        crate::routes::claims::ClaimVerificationResponse,
    )),
    tags(
        (name = "credit", description = "Score calculation and persistence"),
        (name = "claims", description = "Claim verification"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = spec["paths"].as_object().unwrap();
        for path in ["/v1/credit", "/v1/credit/validate", "/v1/credit/report", "/v1/claims/verify"] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        let credit = &paths["/v1/credit"];
        assert!(credit.get("get").is_some());
        assert!(credit.get("post").is_some());
        assert!(credit.get("put").is_some());
    }

    #[test]
    fn schemas_registered() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &spec["components"]["schemas"];
        assert!(schemas.get("ScoreRecord").is_some());
        assert!(schemas.get("ErrorBody").is_some());
    }
}
