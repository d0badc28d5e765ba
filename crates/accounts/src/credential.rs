//! Credential hashing (Argon2id, salted, slow).

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use minibank_core::{DomainError, DomainResult};

/// One-way hash of an account secret, stored as a PHC string.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap a PHC string loaded from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the hash, even in debug logs.
impl core::fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

/// Argon2id hasher with explicit cost parameters.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl core::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("params", self.argon2.params())
            .finish()
    }
}

impl CredentialHasher {
    /// Build an Argon2id hasher with the given memory (KiB), iteration and
    /// lane counts.
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> DomainResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| DomainError::credential_hashing(format!("invalid argon2 params: {e}")))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash `secret` with a fresh random salt.
    pub fn hash(&self, secret: &str) -> DomainResult<CredentialHash> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| DomainError::credential_hashing(e.to_string()))?;
        Ok(CredentialHash(hash.to_string()))
    }

    /// Check `secret` against a stored hash.
    ///
    /// A hash that does not parse verifies as `false`.
    pub fn verify(&self, secret: &str, hash: &CredentialHash) -> bool {
        let parsed = match PasswordHash::new(hash.as_str()) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "stored credential hash is malformed");
                return false;
            }
        };
        self.argon2.verify_password(secret.as_bytes(), &parsed).is_ok()
    }
}
