//! Service wiring: store selection, hashing, tokens, transfers.
//!
//! Handlers only talk to `AppServices`; nothing below this layer knows
//! about HTTP.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use minibank_accounts::{
    Account, AccountFactory, CredentialHash, TransferConfirmation, TransferRequest,
};
use minibank_auth::{AccountClaims, AuthzError, DenialReason, Hs256Jwt, JwtIssuer, JwtValidator};
use minibank_core::{AccountId, AccountNumber, DomainResult};
use minibank_infra::config::{AppConfig, DatabaseConfig};
use minibank_infra::{
    AccountStore, InMemoryAccountStore, PostgresAccountStore, StoreError, TransferProcessor,
};

use crate::app::errors::ApiError;
use crate::authz::AuthGate;

pub struct AppServices {
    store: Arc<dyn AccountStore>,
    factory: AccountFactory,
    processor: TransferProcessor<Arc<dyn AccountStore>>,
    gate: AuthGate,
    jwt: Arc<Hs256Jwt>,
    // Verified against on unknown-number logins so both paths cost one Argon2 run.
    decoy_hash: CredentialHash,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn AccountStore>,
        factory: AccountFactory,
        jwt: Arc<Hs256Jwt>,
    ) -> DomainResult<Self> {
        let decoy_hash = factory.hasher().hash(&AccountNumber::generate().to_string())?;
        Ok(Self {
            processor: TransferProcessor::new(store.clone()),
            gate: AuthGate::new(store.clone()),
            store,
            factory,
            jwt,
            decoy_hash,
        })
    }

    pub fn validator(&self) -> Arc<dyn JwtValidator> {
        self.jwt.clone()
    }

    /// Build, persist and mint a token for a new account.
    pub async fn create_account(
        &self,
        first_name: String,
        last_name: String,
        secret: String,
    ) -> Result<(Account, String), ApiError> {
        let factory = self.factory.clone();
        // Argon2 is deliberately slow; keep it off the async workers.
        let new_account = tokio::task::spawn_blocking(move || {
            factory.create(&first_name, &last_name, &secret)
        })
        .await
        .map_err(|e| ApiError::Task(e.to_string()))??;

        // Mint first so a signing failure never leaves an account without a token.
        let token = self.jwt.issue(new_account.number, Utc::now())?;
        let account = self.store.create_account(new_account).await?;

        tracing::info!(id = %account.id, number = %account.number, "account created");
        Ok((account, token))
    }

    /// Exchange a number and secret for a fresh token.
    pub async fn login(&self, number: AccountNumber, secret: String) -> Result<String, ApiError> {
        let (hash, known) = match self.store.get_account_by_number(number).await {
            Ok(account) => (account.credential_hash, true),
            Err(StoreError::NotFound) => (self.decoy_hash.clone(), false),
            Err(e) => return Err(e.into()),
        };

        let hasher = self.factory.hasher().clone();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&secret, &hash))
            .await
            .map_err(|e| ApiError::Task(e.to_string()))?;

        if !(known && verified) {
            return Err(self.bad_login(number));
        }

        tracing::info!(number = %number, "login succeeded");
        Ok(self.jwt.issue(number, Utc::now())?)
    }

    /// Accounts the caller owns (at most the one its token names).
    pub async fn list_accounts(&self, claims: &AccountClaims) -> Result<Vec<Account>, ApiError> {
        let mut accounts = self.store.get_accounts().await?;
        accounts.retain(|a| a.number == claims.account_number);
        Ok(accounts)
    }

    pub async fn get_account(&self, claims: &AccountClaims, id: AccountId) -> Result<Account, ApiError> {
        Ok(self.gate.authorize(claims, id).await?)
    }

    pub async fn delete_account(&self, claims: &AccountClaims, id: AccountId) -> Result<(), ApiError> {
        let account = self.gate.authorize(claims, id).await?;
        match self.store.delete_account(account.id).await {
            Ok(()) => {}
            // Deleted concurrently after the ownership check.
            Err(StoreError::NotFound) => {
                let reason = DenialReason::UnknownAccount;
                tracing::warn!(id = %account.id, %reason, "account vanished before delete");
                return Err(ApiError::Denied(AuthzError::denied(reason)));
            }
            Err(e) => return Err(e.into()),
        }
        tracing::info!(id = %account.id, number = %account.number, "account deleted");
        Ok(())
    }

    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferConfirmation, ApiError> {
        Ok(self.processor.transfer(request).await?)
    }

    fn bad_login(&self, number: AccountNumber) -> ApiError {
        let reason = DenialReason::BadCredentials;
        tracing::warn!(number = %number, %reason, "login denied");
        ApiError::Denied(AuthzError::denied(reason))
    }
}

/// Wire services from configuration.
///
/// `DATABASE_URL` set: Postgres (table created if missing). Otherwise the
/// in-memory store, which loses everything on restart.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store = match &config.database {
        Some(db) => build_postgres_store(db).await?,
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory account store");
            Arc::new(InMemoryAccountStore::new()) as Arc<dyn AccountStore>
        }
    };

    let hasher = config.hashing.hasher().context("invalid argon2 parameters")?;
    let ttl = chrono::Duration::from_std(config.token_ttl).context("TOKEN_TTL_SECS out of range")?;
    let jwt = Arc::new(Hs256Jwt::new(config.jwt_secret.as_bytes(), ttl));

    AppServices::new(store, AccountFactory::new(hasher), jwt).context("failed to prepare credential hasher")
}

async fn build_postgres_store(db: &DatabaseConfig) -> anyhow::Result<Arc<dyn AccountStore>> {
    let store = PostgresAccountStore::connect(&db.url, db.max_connections, db.acquire_timeout)
        .await
        .context("failed to connect to Postgres")?;
    store.migrate().await.context("failed to create accounts table")?;
    tracing::info!(max_connections = db.max_connections, "using Postgres account store");
    Ok(Arc::new(store))
}
