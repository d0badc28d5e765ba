//! Transfer intent and its confirmation.
//!
//! Transfers are credit-only: the signed `amount` is applied to the
//! destination account and no source account is debited. Overdraft is
//! permitted (no sufficiency check).

use serde::{Deserialize, Serialize};

use minibank_core::{AccountId, DomainError, DomainResult};

/// A balance mutation intent. Not persisted; consumed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub to_account: AccountId,
    pub amount: i64,
}

impl TransferRequest {
    pub fn new(to_account: AccountId, amount: i64) -> Self {
        Self { to_account, amount }
    }

    /// Reject amounts that would make the transfer a no-op.
    pub fn validate(&self) -> DomainResult<()> {
        if self.amount == 0 {
            return Err(DomainError::invalid_amount("amount must be non-zero"));
        }
        Ok(())
    }
}

/// Result of an applied transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferConfirmation {
    pub to_account: AccountId,
    pub amount: i64,
    /// Destination balance after the transfer was applied.
    pub balance: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_amount_is_invalid() {
        let err = TransferRequest::new(AccountId::new(1), 0).validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidAmount(_)));
    }

    #[test]
    fn request_uses_camel_case_on_the_wire() {
        let req: TransferRequest =
            serde_json::from_str(r#"{"toAccount": 9, "amount": -25}"#).unwrap();
        assert_eq!(req, TransferRequest::new(AccountId::new(9), -25));
    }

    proptest! {
        #[test]
        fn any_non_zero_amount_is_valid(amount in any::<i64>().prop_filter("non-zero", |a| *a != 0)) {
            prop_assert!(TransferRequest::new(AccountId::new(1), amount).validate().is_ok());
        }
    }
}
