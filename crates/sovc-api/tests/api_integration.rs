//! HTTP surface tests driven through `tower::ServiceExt::oneshot`.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde_json::{json, Value};
use tower::ServiceExt;

use sovc_api::config::ServiceConfig;
use sovc_api::state::AppState;
use sovc_zkp::{CommitmentKey, PolicyMode, SchemeKind};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn global_metrics() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| PrometheusBuilder::new().install_recorder().unwrap())
        .clone()
}

fn dev_config() -> ServiceConfig {
    ServiceConfig {
        commitment_key: Some(CommitmentKey::from_bytes([7u8; 32])),
        proof_policy: PolicyMode::Development,
        ..ServiceConfig::default()
    }
}

fn test_app(config: ServiceConfig) -> Router {
    sovc_api::app(AppState::new(config))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    subject: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(subject) = subject {
        builder = builder.header("x-subject-id", subject);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

fn good_factors() -> Value {
    json!({
        "paymentHistory": 0.92,
        "creditUtilization": 0.15,
        "creditAge": 6.0,
        "creditMix": 3,
        "newCredit": 1
    })
}

// ── Health, metrics, OpenAPI ────────────────────────────────────────────────

#[tokio::test]
async fn health_probes_need_no_auth() {
    let app = test_app(ServiceConfig {
        auth_token: Some("s3cret".into()),
        ..dev_config()
    });
    let (status, body) = send(&app, "GET", "/health/liveness", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    let (status, body) = send(&app, "GET", "/health/readiness", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ready");
}

#[tokio::test]
async fn metrics_count_requests() {
    let app = sovc_api::app(AppState::with_metrics(dev_config(), global_metrics()));
    send(&app, "GET", "/health/liveness", None, None).await;

    let (status, body) = send(&app, "GET", "/metrics", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains("http_requests_total"), "{text}");
    assert!(text.contains("/health/liveness"));
}

#[tokio::test]
async fn openapi_document_served() {
    let app = test_app(dev_config());
    let (status, body) = send(&app, "GET", "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/v1/credit"].is_object());
}

// ── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn v1_routes_require_a_subject() {
    let app = test_app(dev_config());
    let (status, body) = send(&app, "GET", "/v1/credit", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn bearer_token_identifies_subject() {
    let app = test_app(ServiceConfig {
        auth_token: Some("s3cret".into()),
        ..dev_config()
    });
    let request = |token: &str| {
        Request::builder()
            .method("POST")
            .uri("/v1/credit")
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(json!({ "credit_factors": good_factors() }).to_string()))
            .unwrap()
    };

    let ok = app.clone().oneshot(request("alice:s3cret")).await.unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    let bytes = ok.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["credit_score"]["subject_id"], "alice");

    let denied = app.clone().oneshot(request("alice:wrong")).await.unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
}

// ── Credit routes ───────────────────────────────────────────────────────────

#[tokio::test]
async fn validate_reports_every_violation() {
    let app = test_app(dev_config());
    let (status, body) = send(
        &app,
        "POST",
        "/v1/credit/validate",
        Some("alice"),
        Some(json!({ "credit_factors": { "paymentHistory": 1.2, "creditUtilization": -0.1, "creditMix": -1 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
    assert_eq!(body["errors"][0]["field"], "paymentHistory");

    let (_, body) = send(
        &app,
        "POST",
        "/v1/credit/validate",
        Some("alice"),
        Some(json!({ "credit_factors": good_factors() })),
    )
    .await;
    assert_eq!(body["valid"], true);
    assert!(body["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_then_fetch_latest() {
    let app = test_app(dev_config());

    let (status, _) = send(&app, "GET", "/v1/credit", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, created) = send(
        &app,
        "POST",
        "/v1/credit",
        Some("alice"),
        Some(json!({ "credit_factors": good_factors() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let record = &created["credit_score"];
    assert_eq!(record["sovereign_score"], 1000);
    assert_eq!(record["is_verified"], false);
    assert_eq!(record["verification_method"], "basic");
    assert_eq!(record["calculated_at"], record["updated_at"]);

    let (_, second) = send(
        &app,
        "POST",
        "/v1/credit",
        Some("alice"),
        Some(json!({
            "credit_factors": { "paymentHistory": "poor", "creditUtilization": 0.9 },
            "zkp_proof": { "claim_id": "external" }
        })),
    )
    .await;
    assert_eq!(second["credit_score"]["is_verified"], true);
    assert_eq!(second["credit_score"]["verification_method"], "zkp");

    let (status, latest) = send(&app, "GET", "/v1/credit", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["credit_score"]["id"], second["credit_score"]["id"]);

    let (status, _) = send(&app, "GET", "/v1/credit", Some("bob"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_factors_are_unprocessable() {
    let app = test_app(dev_config());
    let (status, body) = send(
        &app,
        "POST",
        "/v1/credit",
        Some("alice"),
        Some(json!({ "credit_factors": { "paymentHistory": 1.5, "creditAge": -2 } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = test_app(dev_config());
    let (status, body) = send(&app, "POST", "/v1/credit", Some("alice"), Some(json!({"nope": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn update_only_touches_own_records() {
    let app = test_app(dev_config());
    let (_, created) = send(
        &app,
        "POST",
        "/v1/credit",
        Some("alice"),
        Some(json!({ "credit_factors": good_factors() })),
    )
    .await;
    let id = created["credit_score"]["id"].clone();

    let (status, _) = send(
        &app,
        "PUT",
        "/v1/credit",
        Some("mallory"),
        Some(json!({ "credit_score_id": id, "is_verified": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, updated) = send(
        &app,
        "PUT",
        "/v1/credit",
        Some("alice"),
        Some(json!({ "credit_score_id": id, "is_verified": true, "zkp_proof": { "claim_id": "c" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let record = &updated["credit_score"];
    assert_eq!(record["is_verified"], true);
    assert_eq!(record["verification_method"], "zkp");
    assert_eq!(record["zkp_proof"]["claim_id"], "c");
    assert_eq!(record["calculated_at"], created["credit_score"]["calculated_at"]);

    let (status, _) = send(
        &app,
        "PUT",
        "/v1/credit",
        Some("alice"),
        Some(json!({ "credit_score_id": uuid::Uuid::new_v4(), "is_verified": false })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_update_is_unprocessable() {
    let app = test_app(dev_config());
    let (_, created) = send(
        &app,
        "POST",
        "/v1/credit",
        Some("alice"),
        Some(json!({ "credit_factors": good_factors() })),
    )
    .await;
    let id = created["credit_score"]["id"].clone();

    for body in [
        json!({ "credit_score_id": id }),
        json!({ "credit_score_id": id, "zkp_proof": null }),
    ] {
        let (status, err) = send(&app, "PUT", "/v1/credit", Some("alice"), Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
    }

    let (_, latest) = send(&app, "GET", "/v1/credit", Some("alice"), None).await;
    assert_eq!(latest["credit_score"]["updated_at"], created["credit_score"]["updated_at"]);
}

// ── Reports and claims ──────────────────────────────────────────────────────

#[tokio::test]
async fn report_claim_round_trips_through_verify() {
    let app = test_app(dev_config());
    let (status, report) = send(
        &app,
        "POST",
        "/v1/credit/report",
        Some("alice"),
        Some(json!({ "credit_factors": good_factors() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["sovereign_score"], 1000);
    assert_eq!(report["verification_status"], "verified");
    assert_eq!(report["privacy_features"].as_array().unwrap().len(), 5);
    assert!(report["claim"]["commitment"].as_str().unwrap().starts_with("hmac-sha256:"));

    let (_, latest) = send(&app, "GET", "/v1/credit", Some("alice"), None).await;
    assert_eq!(latest["credit_score"]["verification_method"], "zkp");
    assert_eq!(latest["credit_score"]["zkp_proof"], report["claim"]);

    let (status, verdict) = send(
        &app,
        "POST",
        "/v1/claims/verify",
        Some("bob"),
        Some(report["claim"].clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verdict["valid"], true);
    assert_eq!(verdict["binding_valid"], true);
    assert_eq!(verdict["public_fields"]["subject_id"], "alice");
    assert!(verdict.get("policy_rejection").is_none());

    let mut tampered = report["claim"].clone();
    tampered["public_fields"]["score"] = json!(999);
    let (_, verdict) = send(&app, "POST", "/v1/claims/verify", Some("bob"), Some(tampered)).await;
    assert_eq!(verdict["valid"], false);
    assert_eq!(verdict["binding_valid"], false);
}

#[tokio::test]
async fn malformed_claims_are_invalid_not_errors() {
    let app = test_app(dev_config());
    for body in [json!(null), json!({}), json!([1, 2]), json!({ "claim_id": "c" })] {
        let (status, verdict) =
            send(&app, "POST", "/v1/claims/verify", Some("bob"), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(verdict["valid"], false);
        assert!(verdict["malformed"].is_string());
    }
}

#[tokio::test]
async fn production_policy_rejects_transparent_claims() {
    let transparent = test_app(ServiceConfig {
        commitment_scheme: SchemeKind::Transparent,
        ..dev_config()
    });
    let (_, report) = send(
        &transparent,
        "POST",
        "/v1/credit/report",
        Some("alice"),
        Some(json!({ "credit_factors": good_factors() })),
    )
    .await;
    let claim = report["claim"].clone();
    assert!(claim["commitment"].as_str().unwrap().starts_with("commit_"));

    let (_, verdict) = send(&transparent, "POST", "/v1/claims/verify", Some("bob"), Some(claim.clone())).await;
    assert_eq!(verdict["valid"], true);
    assert!(verdict.get("binding_valid").is_none());

    let production = test_app(ServiceConfig {
        proof_policy: PolicyMode::Production,
        ..dev_config()
    });
    let (_, verdict) = send(&production, "POST", "/v1/claims/verify", Some("bob"), Some(claim)).await;
    assert_eq!(verdict["valid"], false);
    assert!(verdict["policy_rejection"].as_str().unwrap().contains("transparent"));
}

#[tokio::test]
async fn claims_from_another_key_fail_binding() {
    let issuer = test_app(dev_config());
    let (_, report) = send(
        &issuer,
        "POST",
        "/v1/credit/report",
        Some("alice"),
        Some(json!({ "credit_factors": good_factors() })),
    )
    .await;

    let other = test_app(ServiceConfig {
        commitment_key: Some(CommitmentKey::from_bytes([8u8; 32])),
        ..dev_config()
    });
    let (_, verdict) = send(&other, "POST", "/v1/claims/verify", Some("bob"), Some(report["claim"].clone())).await;
    assert_eq!(verdict["valid"], false);
    assert_eq!(verdict["binding_valid"], false);
}
