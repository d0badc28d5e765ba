use thiserror::Error;

use minibank_core::AccountNumber;

use crate::claims::{AccountClaims, TokenValidationError};

/// Why a request was denied.
///
/// Kept for logs and tests only. Every reason renders the same outward
/// error so callers cannot tell which accounts exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No `Authorization: Bearer …` header, or an unreadable one.
    MissingToken,
    /// The token failed signature or time validation.
    InvalidToken(TokenValidationError),
    /// The targeted account does not exist.
    UnknownAccount,
    /// The token belongs to a different account than the one targeted.
    OwnershipMismatch,
    /// Login with an unknown number or a wrong secret.
    BadCredentials,
}

impl core::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DenialReason::MissingToken => f.write_str("missing bearer token"),
            DenialReason::InvalidToken(e) => write!(f, "invalid token: {e}"),
            DenialReason::UnknownAccount => f.write_str("unknown account"),
            DenialReason::OwnershipMismatch => f.write_str("token does not own account"),
            DenialReason::BadCredentials => f.write_str("bad credentials"),
        }
    }
}

/// The single outward authorization failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("permission denied")]
    PermissionDenied(DenialReason),
}

impl AuthzError {
    pub fn denied(reason: DenialReason) -> Self {
        Self::PermissionDenied(reason)
    }

    pub fn reason(&self) -> DenialReason {
        match self {
            AuthzError::PermissionDenied(reason) => *reason,
        }
    }
}

impl From<TokenValidationError> for AuthzError {
    fn from(value: TokenValidationError) -> Self {
        Self::PermissionDenied(DenialReason::InvalidToken(value))
    }
}

/// Ownership check: the token's account number must equal the target's.
///
/// - No IO
/// - No panics
pub fn authorize_owner(claims: &AccountClaims, target: AccountNumber) -> Result<(), AuthzError> {
    if claims.account_number == target {
        Ok(())
    } else {
        Err(AuthzError::denied(DenialReason::OwnershipMismatch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    fn claims_for(number: i64) -> AccountClaims {
        AccountClaims::new(AccountNumber::new(number), Utc::now(), Duration::minutes(5)).unwrap()
    }

    #[test]
    fn owner_is_authorized() {
        assert_eq!(authorize_owner(&claims_for(42), AccountNumber::new(42)), Ok(()));
    }

    #[test]
    fn denial_message_does_not_leak_reason() {
        let unknown = AuthzError::denied(DenialReason::UnknownAccount);
        let expired = AuthzError::from(TokenValidationError::Expired);
        assert_eq!(unknown.to_string(), expired.to_string());
        assert_eq!(expired.reason(), DenialReason::InvalidToken(TokenValidationError::Expired));
    }

    proptest! {
        /// Property: a token for N is denied against every number other than N.
        #[test]
        fn other_numbers_are_denied(owner in 1i64..=i64::MAX, target in 1i64..=i64::MAX) {
            prop_assume!(owner != target);
            let err = authorize_owner(&claims_for(owner), AccountNumber::new(target)).unwrap_err();
            prop_assert_eq!(err.reason(), DenialReason::OwnershipMismatch);
        }
    }
}
