//! Account construction.

use chrono::{DateTime, Utc};

use minibank_core::{AccountNumber, DomainError, DomainResult};

use crate::account::{validate_name, NewAccount};
use crate::credential::CredentialHasher;

/// Builds new account identities: number, hashed credential, timestamp.
///
/// No IO. The store assigns the id and enforces number uniqueness.
#[derive(Debug, Clone, Default)]
pub struct AccountFactory {
    hasher: CredentialHasher,
}

impl AccountFactory {
    pub fn new(hasher: CredentialHasher) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    /// Build a new account stamped with the current UTC time.
    pub fn create(&self, first_name: &str, last_name: &str, secret: &str) -> DomainResult<NewAccount> {
        self.create_at(first_name, last_name, secret, Utc::now())
    }

    /// Build a new account with an explicit creation time.
    ///
    /// Either every field is populated or an error is returned.
    pub fn create_at(
        &self,
        first_name: &str,
        last_name: &str,
        secret: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<NewAccount> {
        let first_name = validate_name("first_name", first_name)?;
        let last_name = validate_name("last_name", last_name)?;
        if secret.is_empty() {
            return Err(DomainError::validation("secret must not be empty"));
        }

        let credential_hash = self.hasher.hash(secret)?;

        Ok(NewAccount {
            first_name,
            last_name,
            number: AccountNumber::generate(),
            credential_hash,
            created_at: now,
        })
    }
}
