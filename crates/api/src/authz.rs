//! Account ownership gate.
//!
//! Resolves the targeted account through the store and checks it against the
//! caller's claims before a handler touches it. Handlers for `/account/:id`
//! call this first and never read the account any other way.

use std::sync::Arc;

use thiserror::Error;

use minibank_accounts::Account;
use minibank_auth::{authorize_owner, AccountClaims, AuthzError, DenialReason};
use minibank_core::AccountId;
use minibank_infra::{AccountStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error(transparent)]
    Denied(#[from] AuthzError),

    /// The store could not answer; this is not a denial.
    #[error(transparent)]
    Store(StoreError),
}

#[derive(Clone)]
pub struct AuthGate {
    store: Arc<dyn AccountStore>,
}

impl AuthGate {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Load `requested` and succeed only if its number matches the claims.
    ///
    /// A missing account is denied exactly like someone else's account.
    pub async fn authorize(
        &self,
        claims: &AccountClaims,
        requested: AccountId,
    ) -> Result<Account, GateError> {
        let account = match self.store.get_account_by_id(requested).await {
            Ok(account) => account,
            Err(StoreError::NotFound) => {
                return Err(self.deny(claims, requested, DenialReason::UnknownAccount));
            }
            Err(e) => return Err(GateError::Store(e)),
        };

        if let Err(e) = authorize_owner(claims, account.number) {
            return Err(self.deny(claims, requested, e.reason()));
        }

        Ok(account)
    }

    fn deny(&self, claims: &AccountClaims, requested: AccountId, reason: DenialReason) -> GateError {
        tracing::warn!(
            token_number = %claims.account_number,
            requested = %requested,
            %reason,
            "account access denied"
        );
        GateError::Denied(AuthzError::denied(reason))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use minibank_accounts::{CredentialHash, NewAccount};
    use minibank_core::AccountNumber;
    use minibank_infra::InMemoryAccountStore;

    use super::*;

    async fn gate_with_account(number: i64) -> (AuthGate, Account) {
        let store = Arc::new(InMemoryAccountStore::new());
        let account = store
            .create_account(NewAccount {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                number: AccountNumber::new(number),
                credential_hash: CredentialHash::from_phc("$argon2id$stub"),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        (AuthGate::new(store), account)
    }

    fn claims(number: i64) -> AccountClaims {
        AccountClaims::new(AccountNumber::new(number), Utc::now(), Duration::minutes(5)).unwrap()
    }

    #[tokio::test]
    async fn owner_gets_the_account() {
        let (gate, account) = gate_with_account(77).await;
        assert_eq!(gate.authorize(&claims(77), account.id).await, Ok(account));
    }

    #[tokio::test]
    async fn other_number_is_denied() {
        let (gate, account) = gate_with_account(77).await;
        let err = gate.authorize(&claims(78), account.id).await.unwrap_err();
        assert_eq!(
            err,
            GateError::Denied(AuthzError::denied(DenialReason::OwnershipMismatch))
        );
    }

    #[tokio::test]
    async fn unknown_account_is_denied_not_missing() {
        let (gate, _account) = gate_with_account(77).await;
        let err = gate.authorize(&claims(77), AccountId::new(404)).await.unwrap_err();
        assert_eq!(
            err,
            GateError::Denied(AuthzError::denied(DenialReason::UnknownAccount))
        );
    }
}
