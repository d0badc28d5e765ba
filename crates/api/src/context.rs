use minibank_auth::AccountClaims;
use minibank_core::AccountNumber;

/// Authenticated caller for a request.
///
/// Inserted by the auth middleware once the bearer token validates; every
/// protected handler can rely on it being present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountContext {
    claims: AccountClaims,
}

impl AccountContext {
    pub fn new(claims: AccountClaims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &AccountClaims {
        &self.claims
    }

    pub fn account_number(&self) -> AccountNumber {
        self.claims.account_number
    }
}
