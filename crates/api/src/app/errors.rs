//! The one place errors become HTTP responses.
//!
//! Body shape is always `{"error": <code>, "message": <text>}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use minibank_auth::{AuthzError, TokenIssueError};
use minibank_core::DomainError;
use minibank_infra::{StoreError, TransferError};

use crate::authz::GateError;

/// Anything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Denied(#[from] AuthzError),

    #[error(transparent)]
    Issue(#[from] TokenIssueError),

    #[error("malformed request body: {0}")]
    Body(String),

    #[error("background task failed: {0}")]
    Task(String),
}

impl From<GateError> for ApiError {
    fn from(value: GateError) -> Self {
        match value {
            GateError::Denied(e) => ApiError::Denied(e),
            GateError::Store(e) => ApiError::Store(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::Body(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Domain(e) => domain_error_to_response(e),
            ApiError::Store(e) => store_error_to_response(e),
            ApiError::Transfer(e) => transfer_error_to_response(e),
            ApiError::Denied(e) => authz_error_to_response(e),
            ApiError::Issue(e) => {
                tracing::error!(error = %e, "token issue failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", "could not issue token")
            }
            ApiError::Body(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_body", msg),
            ApiError::Task(msg) => {
                tracing::error!(error = %msg, "background task failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
            }
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvalidAmount(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_amount", msg),
        DomainError::CredentialHashing(msg) => {
            tracing::error!(error = %msg, "credential hashing failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "hashing_error", "could not process credentials")
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "account not found"),
        StoreError::DuplicateIdentifier(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        e @ StoreError::BalanceOverflow(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_amount", e.to_string())
        }
        StoreError::Unavailable(msg) => {
            tracing::error!(error = %msg, "account store unavailable");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "store unavailable")
        }
    }
}

pub fn transfer_error_to_response(err: TransferError) -> axum::response::Response {
    match err {
        TransferError::InvalidAmount(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_amount", msg),
        TransferError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "account not found"),
        TransferError::Store(e) => store_error_to_response(e),
    }
}

/// Every denial looks the same from outside. Callers log the reason.
pub fn authz_error_to_response(_err: AuthzError) -> axum::response::Response {
    permission_denied()
}

pub fn permission_denied() -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "permission_denied", "access denied")
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
