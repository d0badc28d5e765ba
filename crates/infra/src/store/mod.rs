//! Account persistence boundary.
//!
//! The `AccountStore` trait is the only way the rest of the system reads or
//! mutates accounts; backends are swappable (in-memory for tests/dev,
//! Postgres for deployments).

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryAccountStore;
pub use postgres::PostgresAccountStore;
pub use r#trait::{AccountStore, StoreError};
