//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Internal identifier of an account, assigned by the store at creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

/// External-facing account handle.
///
/// Generated once at account creation and embedded in bearer tokens; never
/// reassigned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(i64);

macro_rules! impl_i64_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                if value <= 0 {
                    return Err(DomainError::invalid_id(format!(
                        "{}: must be positive, got {}",
                        $name, value
                    )));
                }
                Ok(Self(value))
            }
        }
    };
}

impl_i64_newtype!(AccountId, "AccountId");
impl_i64_newtype!(AccountNumber, "AccountNumber");

impl AccountNumber {
    /// Draw a fresh account number uniformly from `1..=i64::MAX`.
    ///
    /// With ~2^63 possible values the birthday bound keeps collisions
    /// negligible; the store's unique constraint catches the rest.
    pub fn generate() -> Self {
        Self(rand::thread_rng().gen_range(1..=i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_numbers_do_not_collide() {
        let mut seen = HashSet::with_capacity(10_000);
        for _ in 0..10_000 {
            let number = AccountNumber::generate();
            assert!(number.get() > 0);
            assert!(seen.insert(number), "duplicate account number {number}");
        }
    }

    #[test]
    fn parse_rejects_non_positive_and_garbage() {
        assert!(matches!("0".parse::<AccountId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!("-4".parse::<AccountId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!("abc".parse::<AccountNumber>(), Err(DomainError::InvalidId(_))));
        assert_eq!("42".parse::<AccountId>().unwrap(), AccountId::new(42));
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&AccountNumber::new(991)).unwrap();
        assert_eq!(json, "991");
    }

    proptest::proptest! {
        #[test]
        fn display_then_parse_preserves_positive_ids(raw in 1i64..=i64::MAX) {
            let id = AccountId::new(raw);
            proptest::prop_assert_eq!(id.to_string().parse::<AccountId>().unwrap(), id);
        }
    }
}
