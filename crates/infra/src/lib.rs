//! Infrastructure layer: account storage, transfer execution, configuration.

pub mod config;
pub mod store;
pub mod transfer;

pub use config::{AppConfig, ConfigError};
pub use store::{AccountStore, InMemoryAccountStore, PostgresAccountStore, StoreError};
pub use transfer::{TransferError, TransferProcessor};
