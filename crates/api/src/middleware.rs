use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use minibank_auth::{AuthzError, DenialReason, JwtValidator};

use crate::app::errors;
use crate::context::AccountContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Require a valid bearer token and attach its claims as `AccountContext`.
///
/// Every failure (no header, wrong scheme, bad signature, expiry) renders
/// the same 403; the specific cause only goes to the log.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let path = req.uri().path().to_owned();

    let token = extract_bearer(req.headers()).map_err(|e| deny(&path, e))?;

    let claims = state
        .jwt
        .validate(token, Utc::now())
        .map_err(|e| deny(&path, AuthzError::from(e)))?;

    req.extensions_mut().insert(AccountContext::new(claims));

    Ok(next.run(req).await)
}

fn deny(path: &str, err: AuthzError) -> Response {
    tracing::warn!(path, reason = %err.reason(), "request denied");
    errors::authz_error_to_response(err)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthzError> {
    let missing = || AuthzError::denied(DenialReason::MissingToken);

    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(missing)?;

    let header = header.to_str().map_err(|_| missing())?;

    let header = header.strip_prefix("Bearer ").ok_or_else(missing)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(missing());
    }

    Ok(token)
}
