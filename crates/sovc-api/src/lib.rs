//! # sovc-api: HTTP Service for Sovereign Credit Scoring
//!
//! ## API Surface
//!
//! | Route | Module | Auth |
//! |---|---|---|
//! | `/v1/credit/*` | [`routes::credit`] | yes |
//! | `/v1/claims/verify` | [`routes::claims`] | yes |
//! | `/health/liveness`, `/health/readiness` | here | no |
//! | `/metrics` | [`middleware::metrics`] | no |
//! | `/openapi.json` | [`openapi`] | no |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware (/v1 only) → Handler
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router.
///
/// Health probes, metrics and the OpenAPI document are mounted outside the
/// auth middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::credit::router())
        .merge(routes::claims::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(axum::Extension(auth_config));

    let public = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(middleware::metrics::render))
        .merge(openapi::router());

    Router::new()
        .merge(public)
        .merge(api)
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. State is built before the listener binds, so a running
/// server is always ready.
async fn readiness() -> &'static str {
    "ready"
}
