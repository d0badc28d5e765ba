use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use minibank_core::AccountNumber;

/// Bearer token claims (transport-agnostic).
///
/// Decoded once during validation; downstream code never inspects the raw
/// claim map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClaims {
    /// Account the token was minted for.
    pub account_number: AccountNumber,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl AccountClaims {
    /// `None` if `now + ttl` falls outside the representable time range.
    pub fn new(account_number: AccountNumber, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        Some(Self {
            account_number,
            issued_at: now,
            expires_at: now.checked_add_signed(ttl)?,
        })
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("invalid token signature or algorithm")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate token claims against `now`.
///
/// Expiry wins over every other time check so a stale token always reports
/// `Expired`.
pub fn validate_claims(claims: &AccountClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    Ok(())
}
