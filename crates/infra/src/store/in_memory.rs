use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use minibank_accounts::{Account, NewAccount};
use minibank_core::{AccountId, AccountNumber};

use super::r#trait::{AccountStore, StoreError};

#[derive(Debug, Default)]
struct Accounts {
    last_id: i64,
    by_id: HashMap<AccountId, Account>,
    by_number: HashMap<AccountNumber, AccountId>,
}

/// In-memory account store.
///
/// Intended for tests/dev. Ids are assigned from a counter starting at 1 and
/// are never reused, mirroring a `BIGSERIAL` column.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<Accounts>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;

        if accounts.by_number.contains_key(&account.number) {
            return Err(StoreError::DuplicateIdentifier(format!(
                "account number {}",
                account.number
            )));
        }

        accounts.last_id += 1;
        let id = AccountId::new(accounts.last_id);
        let stored = account.into_account(id);

        accounts.by_number.insert(stored.number, id);
        accounts.by_id.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_account_by_id(&self, id: AccountId) -> Result<Account, StoreError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        accounts.by_id.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn get_account_by_number(&self, number: AccountNumber) -> Result<Account, StoreError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        accounts
            .by_number
            .get(&number)
            .and_then(|id| accounts.by_id.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        Ok(accounts.by_id.values().cloned().collect())
    }

    async fn update_balance(&self, id: AccountId, delta: i64) -> Result<i64, StoreError> {
        // Read-modify-write under a single write lock.
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        let account = accounts.by_id.get_mut(&id).ok_or(StoreError::NotFound)?;
        let balance = account
            .balance
            .checked_add(delta)
            .ok_or(StoreError::BalanceOverflow(id))?;
        account.balance = balance;
        Ok(balance)
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        let removed = accounts.by_id.remove(&id).ok_or(StoreError::NotFound)?;
        accounts.by_number.remove(&removed.number);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use minibank_accounts::CredentialHash;

    use super::*;

    fn new_account(number: i64) -> NewAccount {
        NewAccount {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            number: AccountNumber::new(number),
            credential_hash: CredentialHash::from_phc("$argon2id$v=19$stub"),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_then_lookup_by_number_returns_same_account() {
        let store = InMemoryAccountStore::new();
        let created = store.create_account(new_account(1001)).await.unwrap();

        let by_number = store.get_account_by_number(AccountNumber::new(1001)).await.unwrap();
        let by_id = store.get_account_by_id(created.id).await.unwrap();

        assert_eq!(by_number, created);
        assert_eq!(by_id, created);
        assert_eq!(created.balance, 0);
    }

    #[tokio::test]
    async fn ids_are_sequential_and_not_reused() {
        let store = InMemoryAccountStore::new();
        let a = store.create_account(new_account(1)).await.unwrap();
        store.delete_account(a.id).await.unwrap();
        let b = store.create_account(new_account(2)).await.unwrap();

        assert_eq!(a.id, AccountId::new(1));
        assert_eq!(b.id, AccountId::new(2));
    }

    #[tokio::test]
    async fn duplicate_number_is_rejected() {
        let store = InMemoryAccountStore::new();
        store.create_account(new_account(7)).await.unwrap();

        let err = store.create_account(new_account(7)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIdentifier(_)));
        assert_eq!(store.get_accounts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = InMemoryAccountStore::new();
        let missing = AccountId::new(99);

        assert_eq!(store.get_account_by_id(missing).await, Err(StoreError::NotFound));
        assert_eq!(
            store.get_account_by_number(AccountNumber::new(99)).await,
            Err(StoreError::NotFound)
        );
        assert_eq!(store.update_balance(missing, 10).await, Err(StoreError::NotFound));
        assert_eq!(store.delete_account(missing).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let store = InMemoryAccountStore::new();
        let account = store.create_account(new_account(5)).await.unwrap();

        assert_eq!(store.delete_account(account.id).await, Ok(()));
        assert_eq!(store.delete_account(account.id).await, Err(StoreError::NotFound));
        assert_eq!(
            store.get_account_by_number(account.number).await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = InMemoryAccountStore::new();
        assert!(store.get_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn overflowing_update_leaves_balance_unchanged() {
        let store = InMemoryAccountStore::new();
        let account = store.create_account(new_account(8)).await.unwrap();
        store.update_balance(account.id, i64::MAX).await.unwrap();

        let err = store.update_balance(account.id, 1).await.unwrap_err();
        assert_eq!(err, StoreError::BalanceOverflow(account.id));
        assert_eq!(store.get_account_by_id(account.id).await.unwrap().balance, i64::MAX);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_are_not_lost() {
        let store = Arc::new(InMemoryAccountStore::new());
        let account = store.create_account(new_account(11)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.update_balance(account.id, 2).await.unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(store.get_account_by_id(account.id).await.unwrap().balance, 100);
    }
}
