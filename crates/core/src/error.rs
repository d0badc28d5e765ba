//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Deterministic business failures only (validation, malformed amounts,
/// hashing). Storage and token failures have their own error types in the
/// infra and auth crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. empty name or secret).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A transfer amount was zero or otherwise unusable.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The credential hasher failed (bad parameters, resource exhaustion).
    #[error("credential hashing failed: {0}")]
    CredentialHashing(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn credential_hashing(msg: impl Into<String>) -> Self {
        Self::CredentialHashing(msg.into())
    }}
