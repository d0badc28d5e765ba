//! Bearer token minting and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use minibank_core::AccountNumber;

use crate::claims::{validate_claims, AccountClaims, TokenValidationError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenIssueError {
    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("token expiry is out of range")]
    ExpiryOutOfRange,
}

/// Mints signed tokens for an account.
pub trait JwtIssuer: Send + Sync {
    fn issue(&self, account_number: AccountNumber, now: DateTime<Utc>) -> Result<String, TokenIssueError>;
}

/// Verifies a raw token and returns its typed claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AccountClaims, TokenValidationError>;
}

/// HS256 issuer + validator keyed by a process-wide secret.
///
/// The secret comes from configuration at construction time and is never
/// derived from request data.
#[derive(Clone)]
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl core::fmt::Debug for Hs256Jwt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Jwt").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl Hs256Jwt {
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    // Expiry and signature are enforced by `validate_claims` and the second
    // decode pass respectively, not by jsonwebtoken's registered-claim checks.
    fn base_validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation
    }
}

impl JwtIssuer for Hs256Jwt {
    fn issue(&self, account_number: AccountNumber, now: DateTime<Utc>) -> Result<String, TokenIssueError> {
        let claims = AccountClaims::new(account_number, now, self.ttl)
            .ok_or(TokenIssueError::ExpiryOutOfRange)?;
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenIssueError::Signing(e.to_string()))
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AccountClaims, TokenValidationError> {
        // Time checks run on the unverified payload first so an expired token
        // reports `Expired` whatever its signature.
        let mut unverified = Self::base_validation();
        unverified.insecure_disable_signature_validation();
        let peeked = decode::<AccountClaims>(token, &DecodingKey::from_secret(&[]), &unverified)
            .map_err(|_| TokenValidationError::InvalidSignature)?;
        validate_claims(&peeked.claims, now)?;

        let verified = decode::<AccountClaims>(token, &self.decoding, &Self::base_validation())
            .map_err(|_| TokenValidationError::InvalidSignature)?;
        Ok(verified.claims)
    }
}
