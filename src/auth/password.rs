//! Salted one-way password hashing
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`),
//! so the salt and cost travel with the hash and verification needs nothing
//! else. Hashing is CPU and memory heavy; the async entry points move the work
//! onto tokio's blocking pool so a slow hash never stalls other requests.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::ServerConfig;
use crate::constants::{DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB, DEFAULT_HASH_PARALLELISM};
use crate::error::{Result, ShineStoreError};

/// Argon2id hasher with a fixed cost
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Creates a hasher with the default cost (19 MiB, 2 passes, 1 lane)
    pub fn new() -> Result<Self> {
        Self::with_params(
            DEFAULT_HASH_MEMORY_KIB,
            DEFAULT_HASH_ITERATIONS,
            DEFAULT_HASH_PARALLELISM,
        )
    }

    /// Creates a hasher with a custom cost
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| ShineStoreError::ConfigError(format!("Invalid hashing parameters: {}", e)))?;
        Ok(Self { params })
    }

    /// Creates a hasher from the server configuration
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        Self::with_params(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
        )
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a password with a fresh random salt, on the calling thread
    pub fn hash_blocking(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ShineStoreError::HashingError(e.to_string()))
    }

    /// Checks a password against a stored hash, on the calling thread.
    ///
    /// Uses the salt and cost embedded in `hash`. A malformed hash is a
    /// mismatch, never an error.
    pub fn verify_blocking(&self, plaintext: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("Stored password hash could not be parsed: {}", e);
                return false;
            }
        };

        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Hashes a password on the blocking pool
    pub async fn hash(&self, plaintext: String) -> Result<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_blocking(&plaintext)).await?
    }

    /// Verifies a password on the blocking pool
    pub async fn verify(&self, plaintext: String, hash: String) -> bool {
        let hasher = self.clone();
        match tokio::task::spawn_blocking(move || hasher.verify_blocking(&plaintext, &hash)).await {
            Ok(matched) => matched,
            Err(e) => {
                log::error!("Password verification task failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_same_password_gets_distinct_hashes() {
        let hasher = fast_hasher();
        let first = hasher.hash_blocking("secret123").unwrap();
        let second = hasher.hash_blocking("secret123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify_blocking("secret123", &first));
        assert!(hasher.verify_blocking("secret123", &second));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hasher = fast_hasher();
        let hash = hasher.hash_blocking("secret123").unwrap();
        assert!(!hasher.verify_blocking("secret124", &hash));
        assert!(!hasher.verify_blocking("", &hash));
    }

    #[test]
    fn test_hash_is_argon2id_phc_string() {
        let hash = fast_hasher().hash_blocking("secret123").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
        assert!(!hash.contains("secret123"));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        let hasher = fast_hasher();
        assert!(!hasher.verify_blocking("secret123", ""));
        assert!(!hasher.verify_blocking("secret123", "not-a-hash"));
        assert!(!hasher.verify_blocking("secret123", "$argon2id$v=19$garbage"));
        assert!(!hasher.verify_blocking("secret123", "$2b$10$abcdefghijklmnopqrstuv"));
    }

    #[test]
    fn test_verification_uses_cost_embedded_in_hash() {
        let strong = PasswordHasher::with_params(2048, 2, 1).unwrap();
        let hash = strong.hash_blocking("secret123").unwrap();
        assert!(fast_hasher().verify_blocking("secret123", &hash));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(PasswordHasher::with_params(1, 1, 1).is_err());
        assert!(PasswordHasher::with_params(1024, 0, 1).is_err());
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("secret123".to_string()).await.unwrap();
        assert!(hasher.verify("secret123".to_string(), hash.clone()).await);
        assert!(!hasher.verify("wrong".to_string(), hash).await);
    }
}
