//! # Authentication Middleware
//!
//! Every `/v1` route acts on behalf of one subject. The middleware resolves
//! that subject and injects a [`CallerIdentity`] into request extensions.
//!
//! ## Token Format
//!
//! ```text
//! Authorization: Bearer {subject_id}:{secret}
//! ```
//!
//! The secret is compared in constant time against the configured token.
//! When no token is configured, authentication is disabled and the subject
//! is read from the `x-subject-id` header instead. A request with neither
//! is rejected with 401.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;

use sovc_core::SubjectId;

use crate::error::{AppError, ErrorBody, ErrorDetail};

/// Header naming the caller when authentication is disabled.
pub const SUBJECT_HEADER: &str = "x-subject-id";

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// The subject on whose behalf the request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub subject_id: SubjectId,
}

/// Extracts the identity that [`auth_middleware`] injected into extensions.
/// Returns 401 if none is present.
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer secrets.
///
/// On a length mismatch a dummy comparison still runs so that timing does
/// not depend on where the mismatch is.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse `{subject_id}:{secret}` and check the secret.
///
/// The subject id may not contain `:`; the secret may.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    let (subject, secret) = provided
        .split_once(':')
        .ok_or_else(|| "invalid token format, expected {subject_id}:{secret}".to_string())?;

    if !constant_time_token_eq(secret, expected_secret) {
        return Err("invalid bearer token".into());
    }

    let subject_id = SubjectId::new(subject).map_err(|e| format!("invalid subject id: {e}"))?;
    Ok(CallerIdentity { subject_id })
}

fn subject_from_header(request: &Request) -> Result<CallerIdentity, String> {
    let raw = request
        .headers()
        .get(SUBJECT_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| format!("missing {SUBJECT_HEADER} header"))?;
    let subject_id = SubjectId::new(raw).map_err(|e| format!("invalid subject id: {e}"))?;
    Ok(CallerIdentity { subject_id })
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Resolve the caller and inject [`CallerIdentity`], or answer 401.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected_token = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|c| c.token.clone());

    let identity = match expected_token {
        Some(expected) => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            match auth_header {
                Some(value) => match value.strip_prefix("Bearer ") {
                    Some(provided) => parse_bearer_token(provided, &expected),
                    None => Err("authorization header must use Bearer scheme".to_string()),
                },
                None => Err("missing authorization header".to_string()),
            }
        }
        None => subject_from_header(&request),
    };

    match identity {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(msg) => {
            tracing::warn!(reason = %msg, "authentication failed");
            unauthorized_response(&msg)
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app(token: Option<&str>) -> Router {
        let auth_config = AuthConfig {
            token: token.map(str::to_string),
        };
        Router::new()
            .route(
                "/whoami",
                get(|caller: CallerIdentity| async move { caller.subject_id.to_string() }),
            )
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(auth_config))
    }

    async fn call(app: Router, headers: &[(&str, &str)]) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/whoami");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_bearer_token_names_the_subject() {
        let (status, body) = call(
            test_app(Some("s3cret")),
            &[("Authorization", "Bearer alice:s3cret")],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alice");
    }

    #[tokio::test]
    async fn wrong_secret_rejected() {
        let (status, body) = call(
            test_app(Some("s3cret")),
            &[("Authorization", "Bearer alice:guess")],
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("UNAUTHORIZED"));
    }

    #[tokio::test]
    async fn missing_or_malformed_header_rejected() {
        let (status, _) = call(test_app(Some("s3cret")), &[]).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(
            test_app(Some("s3cret")),
            &[("Authorization", "Basic YWxpY2U6czNjcmV0")],
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(
            test_app(Some("s3cret")),
            &[("Authorization", "Bearer s3cret")],
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn subject_header_ignored_when_auth_enabled() {
        let (status, _) = call(test_app(Some("s3cret")), &[(SUBJECT_HEADER, "alice")]).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn disabled_auth_reads_subject_header() {
        let (status, body) = call(test_app(None), &[(SUBJECT_HEADER, "bob")]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "bob");

        let (status, _) = call(test_app(None), &[]).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn secret_may_contain_colons() {
        let id = parse_bearer_token("carol:a:b:c", "a:b:c").unwrap();
        assert_eq!(id.subject_id.as_str(), "carol");
        assert!(parse_bearer_token(":a:b:c", "a:b:c").is_err());
    }

    #[test]
    fn constant_time_eq_cases() {
        assert!(constant_time_token_eq("abc", "abc"));
        assert!(!constant_time_token_eq("abc", "abd"));
        assert!(!constant_time_token_eq("ab", "abc"));
    }

    #[test]
    fn auth_config_debug_redacts_token() {
        let dbg = format!("{:?}", AuthConfig { token: Some("hunter2".into()) });
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("[REDACTED]"));
    }
}
