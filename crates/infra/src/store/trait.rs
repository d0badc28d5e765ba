use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use minibank_accounts::{Account, NewAccount};
use minibank_core::{AccountId, AccountNumber};

/// Account store operation error.
///
/// These are **infrastructure errors** (lookup misses, constraint violations,
/// backend failures) as opposed to domain errors (validation, amounts).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("account not found")]
    NotFound,

    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("balance overflow on account {0}")]
    BalanceOverflow(AccountId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable account persistence.
///
/// ## Contract
///
/// - Every mutating call is committed before it returns `Ok`.
/// - `update_balance` is a single atomic step per row (never a read followed
///   by a separate write), so concurrent transfers to one account serialize
///   in the backend.
/// - Lookups of missing rows return `StoreError::NotFound`; nothing is a
///   silent no-op.
/// - `get_accounts` order is unspecified.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account and return it with its assigned id.
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn get_account_by_id(&self, id: AccountId) -> Result<Account, StoreError>;

    async fn get_account_by_number(&self, number: AccountNumber) -> Result<Account, StoreError>;

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Add `delta` to the balance and return the new balance.
    async fn update_balance(&self, id: AccountId, delta: i64) -> Result<i64, StoreError>;

    /// Hard delete.
    async fn delete_account(&self, id: AccountId) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        (**self).create_account(account).await
    }

    async fn get_account_by_id(&self, id: AccountId) -> Result<Account, StoreError> {
        (**self).get_account_by_id(id).await
    }

    async fn get_account_by_number(&self, number: AccountNumber) -> Result<Account, StoreError> {
        (**self).get_account_by_number(number).await
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
        (**self).get_accounts().await
    }

    async fn update_balance(&self, id: AccountId, delta: i64) -> Result<i64, StoreError> {
        (**self).update_balance(id, delta).await
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), StoreError> {
        (**self).delete_account(id).await
    }
}
