//! Configuration loading and representation.
//!
//! Everything comes from environment variables. `from_lookup` takes the
//! lookup as a closure so tests never touch the process environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use minibank_accounts::CredentialHasher;
use minibank_core::DomainError;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 900;
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 5;

// Argon2id defaults (19 MiB, 2 passes, 1 lane).
pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 19 * 1024;
pub const DEFAULT_ARGON2_ITERATIONS: u32 = 2;
pub const DEFAULT_ARGON2_PARALLELISM: u32 = 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Postgres connection settings. Present only when `DATABASE_URL` is set.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

// The URL usually carries a password.
impl core::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_ARGON2_MEMORY_KIB,
            iterations: DEFAULT_ARGON2_ITERATIONS,
            parallelism: DEFAULT_ARGON2_PARALLELISM,
        }
    }
}

impl HashingConfig {
    pub fn hasher(&self) -> Result<CredentialHasher, DomainError> {
        CredentialHasher::with_params(self.memory_kib, self.iterations, self.parallelism)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub database: Option<DatabaseConfig>,
    pub hashing: HashingConfig,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("listen_addr", &self.listen_addr)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("database", &self.database)
            .field("hashing", &self.hashing)
            .finish()
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let listen_addr = parse_or(&get, "LISTEN_ADDR", || {
            SocketAddr::from_str(DEFAULT_LISTEN_ADDR).map_err(|e| e.to_string())
        })?;

        let ttl_secs: u64 = parse_or(&get, "TOKEN_TTL_SECS", || Ok(DEFAULT_TOKEN_TTL_SECS))?;
        if ttl_secs == 0 || ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid {
                var: "TOKEN_TTL_SECS",
                reason: format!("must be between 1 and {MAX_TOKEN_TTL_SECS}"),
            });
        }

        let database = match get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", || {
                    Ok(DEFAULT_DB_MAX_CONNECTIONS)
                })?,
                acquire_timeout: Duration::from_secs(parse_or(
                    &get,
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    || Ok(DEFAULT_DB_ACQUIRE_TIMEOUT_SECS),
                )?),
            }),
            None => None,
        };

        let hashing = HashingConfig {
            memory_kib: parse_or(&get, "ARGON2_MEMORY_KIB", || Ok(DEFAULT_ARGON2_MEMORY_KIB))?,
            iterations: parse_or(&get, "ARGON2_ITERATIONS", || Ok(DEFAULT_ARGON2_ITERATIONS))?,
            parallelism: parse_or(&get, "ARGON2_PARALLELISM", || {
                Ok(DEFAULT_ARGON2_PARALLELISM)
            })?,
        };

        Ok(Self {
            listen_addr,
            jwt_secret,
            token_ttl: Duration::from_secs(ttl_secs),
            database,
            hashing,
        })
    }
}

fn parse_or<T, G, D>(get: &G, var: &'static str, default: D) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
    G: Fn(&str) -> Option<String>,
    D: FnOnce() -> Result<T, String>,
{
    match get(var) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => default().map_err(|reason| ConfigError::Invalid { var, reason }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.listen_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(cfg.token_ttl, Duration::from_secs(900));
        assert_eq!(cfg.database, None);
        assert_eq!(cfg.hashing, HashingConfig::default());
    }

    #[test]
    fn missing_or_blank_secret_is_an_error() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("JWT_SECRET"))
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("JWT_SECRET", "  ")])),
            Err(ConfigError::Missing("JWT_SECRET"))
        );
    }

    #[test]
    fn database_settings_follow_database_url() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "k"),
            ("DATABASE_URL", "postgres://bank:pw@localhost/bank"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();

        let db = cfg.database.unwrap();
        assert_eq!(db.url, "postgres://bank:pw@localhost/bank");
        assert_eq!(db.max_connections, 12);
        assert_eq!(db.acquire_timeout, Duration::from_secs(5));
        assert!(!format!("{db:?}").contains("pw"));
    }

    #[test]
    fn parse_errors_name_the_variable() {
        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "k"), ("TOKEN_TTL_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "TOKEN_TTL_SECS", .. }));
        assert!(err.to_string().starts_with("TOKEN_TTL_SECS"));

        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "k"), ("LISTEN_ADDR", "nowhere")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LISTEN_ADDR", .. }));
    }

    #[test]
    fn ttl_outside_one_year_is_rejected() {
        for raw in ["0", "31536001", "9000000000000"] {
            let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "k"), ("TOKEN_TTL_SECS", raw)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { var: "TOKEN_TTL_SECS", .. }), "{raw}");
        }

        let cfg = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "k"), ("TOKEN_TTL_SECS", "31536000")]))
            .unwrap();
        assert_eq!(cfg.token_ttl, Duration::from_secs(MAX_TOKEN_TTL_SECS));
    }

    #[test]
    fn argon2_overrides_build_a_hasher() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "k"),
            ("ARGON2_MEMORY_KIB", "8"),
            ("ARGON2_ITERATIONS", "1"),
        ]))
        .unwrap();

        assert_eq!(cfg.hashing.memory_kib, 8);
        assert_eq!(cfg.hashing.parallelism, DEFAULT_ARGON2_PARALLELISM);
        assert!(cfg.hashing.hasher().is_ok());
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let cfg = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "hunter2")])).unwrap();
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
