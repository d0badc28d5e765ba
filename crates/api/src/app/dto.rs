use serde::Deserialize;

use minibank_accounts::Account;
use minibank_core::AccountNumber;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub number: AccountNumber,
    pub secret: String,
}

/// Outward view of an account. The credential hash is never included.
pub fn account_to_json(a: &Account) -> serde_json::Value {
    serde_json::json!({
        "id": a.id,
        "firstName": a.first_name,
        "lastName": a.last_name,
        "number": a.number,
        "balance": a.balance,
        "createdAt": a.created_at.to_rfc3339(),
    })
}
