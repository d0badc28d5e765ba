//! Accounts module (identity, credentials, transfer intents).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod account;
pub mod credential;
pub mod factory;
pub mod transfer;

pub use account::{Account, NewAccount, MAX_NAME_LEN};
pub use credential::{CredentialHash, CredentialHasher};
pub use factory::AccountFactory;
pub use transfer::{TransferConfirmation, TransferRequest};
