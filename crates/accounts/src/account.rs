//! Account record (identity + balance).

use chrono::{DateTime, Utc};

use minibank_core::{AccountId, AccountNumber, DomainError, DomainResult};

use crate::credential::CredentialHash;

/// Longest accepted first/last name (matches the `VARCHAR(100)` columns).
pub const MAX_NAME_LEN: usize = 100;

/// An account that has been built but not yet stored.
///
/// Carries every field of [`Account`] except the store-assigned `id`. The
/// balance is not a field: new accounts always start at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub number: AccountNumber,
    pub credential_hash: CredentialHash,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Attach the identifier assigned by the store.
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            number: self.number,
            credential_hash: self.credential_hash,
            balance: 0,
            created_at: self.created_at,
        }
    }
}

/// A persisted account.
///
/// # Invariants
/// - `number` is unique and never changes after creation.
/// - `balance` only moves through validated transfers.
/// - `credential_hash` is never serialized outward (this type does not
///   implement `Serialize`; the API maps it explicitly).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub number: AccountNumber,
    pub credential_hash: CredentialHash,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// Trim and check a display name.
pub fn validate_name(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        assert_eq!(validate_name("first_name", "  Ada ").unwrap(), "Ada");
    }

    #[test]
    fn blank_and_oversized_names_are_rejected() {
        assert!(matches!(
            validate_name("last_name", "   "),
            Err(DomainError::Validation(msg)) if msg.contains("last_name")
        ));
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_name("first_name", &long).is_err());
    }

    #[test]
    fn into_account_starts_at_zero_balance() {
        let new = NewAccount {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            number: AccountNumber::new(77),
            credential_hash: CredentialHash::from_phc("$argon2id$stub"),
            created_at: Utc::now(),
        };
        let account = new.clone().into_account(AccountId::new(3));
        assert_eq!(account.balance, 0);
        assert_eq!(account.id, AccountId::new(3));
        assert_eq!(account.number, new.number);
    }
}
