//! Transfer execution (application-level orchestration).
//!
//! ```text
//! TransferRequest
//!   ↓
//! 1. Validate amount (pure, no IO)
//!   ↓
//! 2. AccountStore::update_balance(to_account, amount)   (one atomic statement)
//!   ↓
//! TransferConfirmation
//! ```
//!
//! Credit-only: the amount lands on the destination and nothing is debited
//! elsewhere. Negative amounts may drive the balance below zero.

use thiserror::Error;

use minibank_accounts::{TransferConfirmation, TransferRequest};
use minibank_core::DomainError;

use crate::store::{AccountStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Zero amount, or an amount that would overflow the balance.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Destination account does not exist.
    #[error("account not found")]
    NotFound,

    /// Backend failure; surfaced without retry.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for TransferError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => TransferError::NotFound,
            StoreError::BalanceOverflow(id) => {
                TransferError::InvalidAmount(format!("balance of account {id} would overflow"))
            }
            other => TransferError::Store(other),
        }
    }
}

impl From<DomainError> for TransferError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::InvalidAmount(msg) | DomainError::Validation(msg) => {
                TransferError::InvalidAmount(msg)
            }
            other => TransferError::InvalidAmount(other.to_string()),
        }
    }
}

/// Applies validated transfers through an `AccountStore`.
#[derive(Debug, Clone)]
pub struct TransferProcessor<S> {
    store: S,
}

impl<S> TransferProcessor<S>
where
    S: AccountStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate and apply one transfer.
    ///
    /// Exactly one balance mutation on success; none on failure.
    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferConfirmation, TransferError> {
        request.validate()?;

        let balance = self
            .store
            .update_balance(request.to_account, request.amount)
            .await?;

        tracing::info!(
            to_account = %request.to_account,
            amount = request.amount,
            balance,
            "transfer applied"
        );

        Ok(TransferConfirmation {
            to_account: request.to_account,
            amount: request.amount,
            balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use minibank_accounts::{CredentialHash, NewAccount};
    use minibank_core::{AccountId, AccountNumber};

    use super::*;
    use crate::store::InMemoryAccountStore;

    async fn setup() -> (Arc<InMemoryAccountStore>, TransferProcessor<Arc<InMemoryAccountStore>>, AccountId) {
        let store = Arc::new(InMemoryAccountStore::new());
        let account = store
            .create_account(NewAccount {
                first_name: "Alan".into(),
                last_name: "Turing".into(),
                number: AccountNumber::new(4242),
                credential_hash: CredentialHash::from_phc("$argon2id$stub"),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        (store.clone(), TransferProcessor::new(store), account.id)
    }

    #[tokio::test]
    async fn credit_then_overdraft() {
        let (store, processor, id) = setup().await;
        store.update_balance(id, 100).await.unwrap();

        let credited = processor.transfer(TransferRequest::new(id, 50)).await.unwrap();
        assert_eq!(credited.balance, 150);

        let debited = processor.transfer(TransferRequest::new(id, -200)).await.unwrap();
        assert_eq!(debited.balance, -50);
        assert_eq!(store.get_account_by_id(id).await.unwrap().balance, -50);
    }

    #[tokio::test]
    async fn zero_amount_is_rejected_without_touching_the_store() {
        let (store, processor, id) = setup().await;

        let err = processor.transfer(TransferRequest::new(id, 0)).await.unwrap_err();
        assert!(matches!(err, TransferError::InvalidAmount(_)));
        assert_eq!(store.get_account_by_id(id).await.unwrap().balance, 0);
    }

    #[tokio::test]
    async fn unknown_destination_is_not_found() {
        let (_store, processor, _id) = setup().await;

        let err = processor
            .transfer(TransferRequest::new(AccountId::new(9_999), 10))
            .await
            .unwrap_err();
        assert_eq!(err, TransferError::NotFound);
    }

    #[tokio::test]
    async fn overflow_is_an_invalid_amount() {
        let (store, processor, id) = setup().await;
        store.update_balance(id, i64::MAX).await.unwrap();

        let err = processor.transfer(TransferRequest::new(id, 1)).await.unwrap_err();
        assert!(matches!(err, TransferError::InvalidAmount(_)));
        assert_eq!(store.get_account_by_id(id).await.unwrap().balance, i64::MAX);
    }

    #[test]
    fn backend_failures_pass_through() {
        let err = TransferError::from(StoreError::Unavailable("down".into()));
        assert_eq!(err, TransferError::Store(StoreError::Unavailable("down".into())));
    }
}
