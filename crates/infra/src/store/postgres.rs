//! Postgres-backed account store.
//!
//! ## Error Mapping
//!
//! | SQLx error | SQLSTATE | StoreError |
//! |------------|----------|------------|
//! | Database (unique violation) | `23505` | `DuplicateIdentifier` |
//! | Database (numeric out of range) | `22003` | `BalanceOverflow` |
//! | anything else (pool closed, IO, TLS, …) | — | `Unavailable` |
//!
//! Missing rows are detected from `fetch_optional`/`rows_affected` and become
//! `NotFound`; they never reach the error mapping.
//!
//! ## Thread Safety
//!
//! `PostgresAccountStore` is `Send + Sync`; `PgPool` handles connection
//! sharing. Each method is one statement, so each runs in its own implicit
//! transaction and is committed when it returns.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use minibank_accounts::{Account, CredentialHash, NewAccount};
use minibank_core::{AccountId, AccountNumber};

use super::r#trait::{AccountStore, StoreError};

const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id              BIGSERIAL PRIMARY KEY,
    first_name      VARCHAR(100) NOT NULL,
    last_name       VARCHAR(100) NOT NULL,
    number          BIGINT NOT NULL UNIQUE,
    credential_hash TEXT NOT NULL,
    balance         BIGINT NOT NULL DEFAULT 0,
    created_at      TIMESTAMPTZ NOT NULL
)
"#;

const SELECT_ACCOUNT: &str = r#"
SELECT id, first_name, last_name, number, credential_hash, balance, created_at
FROM accounts
"#;

/// Postgres-backed account store.
#[derive(Debug, Clone)]
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `accounts` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_ACCOUNTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    #[instrument(skip(self, account), fields(number = %account.number), err)]
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (first_name, last_name, number, credential_hash, balance, created_at)
            VALUES ($1, $2, $3, $4, 0, $5)
            RETURNING id
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.number.get())
        .bind(account.credential_hash.as_str())
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateIdentifier(format!("account number {}", account.number))
            } else {
                map_sqlx_error("create_account", e)
            }
        })?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("create_account", e))?;
        Ok(account.into_account(AccountId::new(id)))
    }

    #[instrument(skip(self), err)]
    async fn get_account_by_id(&self, id: AccountId) -> Result<Account, StoreError> {
        let row = sqlx::query(&format!("{SELECT_ACCOUNT} WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_account_by_id", e))?;
        row_to_account(row)
    }

    #[instrument(skip(self), err)]
    async fn get_account_by_number(&self, number: AccountNumber) -> Result<Account, StoreError> {
        let row = sqlx::query(&format!("{SELECT_ACCOUNT} WHERE number = $1"))
            .bind(number.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_account_by_number", e))?;
        row_to_account(row)
    }

    #[instrument(skip(self), err)]
    async fn get_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query(SELECT_ACCOUNT)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_accounts", e))?;

        rows.iter()
            .map(|row| {
                AccountRow::from_row(row)
                    .map(Account::from)
                    .map_err(|e| map_sqlx_error("get_accounts", e))
            })
            .collect()
    }

    #[instrument(skip(self), err)]
    async fn update_balance(&self, id: AccountId, delta: i64) -> Result<i64, StoreError> {
        // Single statement: the row lock makes concurrent increments serialize.
        let row = sqlx::query(
            "UPDATE accounts SET balance = balance + $2 WHERE id = $1 RETURNING balance",
        )
        .bind(id.get())
        .bind(delta)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_numeric_out_of_range(&e) {
                StoreError::BalanceOverflow(id)
            } else {
                map_sqlx_error("update_balance", e)
            }
        })?;

        let row = row.ok_or(StoreError::NotFound)?;
        row.try_get::<i64, _>("balance")
            .map_err(|e| map_sqlx_error("update_balance", e))
    }

    #[instrument(skip(self), err)]
    async fn delete_account(&self, id: AccountId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_account", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn row_to_account(row: Option<PgRow>) -> Result<Account, StoreError> {
    let row = row.ok_or(StoreError::NotFound)?;
    let account = AccountRow::from_row(&row).map_err(|e| map_sqlx_error("decode_account", e))?;
    Ok(account.into())
}

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some("23505")
}

fn is_numeric_out_of_range(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some("22003")
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Unavailable(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        other => StoreError::Unavailable(format!("{operation}: {other}")),
    }
}

// SQLx row types

#[derive(Debug)]
struct AccountRow {
    id: i64,
    first_name: String,
    last_name: String,
    number: i64,
    credential_hash: String,
    balance: i64,
    created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for AccountRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(AccountRow {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            number: row.try_get("number")?,
            credential_hash: row.try_get("credential_hash")?,
            balance: row.try_get("balance")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: AccountId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            number: AccountNumber::new(row.number),
            credential_hash: CredentialHash::from_phc(row.credential_hash),
            balance: row.balance,
            created_at: row.created_at,
        }
    }
}
