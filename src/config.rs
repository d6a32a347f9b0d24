//! Server configuration module
//! Handles process-wide configuration loaded once at startup

use crate::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB,
    DEFAULT_HASH_PARALLELISM, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOKEN_TTL_SECS,
    MIN_SECRET_BYTES,
};
use crate::error::{Result, ShineStoreError};
use std::env;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JWT secret for token signing/validation
    pub jwt_secret: String,
    /// Lifetime of issued session tokens
    pub token_ttl: Duration,
    /// Store connection string
    pub database_url: String,
    /// Optional JSON file with product documents to seed the catalog
    pub products_file: Option<String>,
    /// Argon2 memory cost in KiB
    pub hash_memory_kib: u32,
    /// Argon2 iteration count
    pub hash_iterations: u32,
    /// Argon2 lanes
    pub hash_parallelism: u32,
}

impl ServerConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            jwt_secret: "unit-test-jwt-key-9f8e7d6c-never-in-production".to_string(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            products_file: None,
            hash_memory_kib: 1024,
            hash_iterations: 1,
            hash_parallelism: 1,
        }
    }

    /// Validate that the signing secret meets security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ShineStoreError::ConfigError(format!(
                "JWT secret must be at least {} bytes (256 bits) long",
                MIN_SECRET_BYTES
            )));
        }

        // Check for insecure default or example values
        let insecure_patterns = ["your-secret-key", "change-this", "changeme", "default", "12345"];

        let lowered = secret.to_lowercase();
        for pattern in &insecure_patterns {
            if lowered.contains(pattern) {
                return Err(ShineStoreError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ShineStoreError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols) for security"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Only the in-memory backend ships with this crate
    fn validate_database_url(url: &str) -> Result<()> {
        if url.starts_with("memory://") {
            Ok(())
        } else {
            Err(ShineStoreError::ConfigError(format!(
                "Unsupported store URL scheme in '{}': only memory:// is available",
                url.split("://").next().unwrap_or(url)
            )))
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = first_of(&lookup, &["SHINE_STORE_HOST"]).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match first_of(&lookup, &["SHINE_STORE_PORT", "PORT"]) {
            Some(p) => p.parse().map_err(|_| {
                ShineStoreError::ConfigError(format!("Invalid port number: {}", p))
            })?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = first_of(&lookup, &["SHINE_STORE_JWT_SECRET", "JWT_SECRET"]).ok_or_else(|| {
            ShineStoreError::ConfigError(
                "JWT_SECRET environment variable is required for security. \
                 Generate one with: openssl rand -base64 32"
                    .to_string(),
            )
        })?;

        let token_ttl = match first_of(&lookup, &["SHINE_STORE_TOKEN_TTL", "EXPIRES_IN"]) {
            Some(raw) => parse_duration(&raw)?,
            None => Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
        };

        let database_url = first_of(&lookup, &["SHINE_STORE_DATABASE_URL", "MONGODB_URI"])
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let products_file = first_of(&lookup, &["SHINE_STORE_PRODUCTS_FILE"]);

        let parse_u32 = |key: &str, default: u32| -> Result<u32> {
            match lookup(key) {
                Some(v) => v.parse().map_err(|_| {
                    ShineStoreError::ConfigError(format!("{} must be a positive integer, got '{}'", key, v))
                }),
                None => Ok(default),
            }
        };

        let hash_memory_kib = parse_u32("SHINE_STORE_HASH_MEMORY_KIB", DEFAULT_HASH_MEMORY_KIB)?;
        let hash_iterations = parse_u32("SHINE_STORE_HASH_ITERATIONS", DEFAULT_HASH_ITERATIONS)?;
        let hash_parallelism = parse_u32("SHINE_STORE_HASH_PARALLELISM", DEFAULT_HASH_PARALLELISM)?;

        Self::validate_jwt_secret(&jwt_secret)?;
        Self::validate_database_url(&database_url)?;

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl,
            database_url,
            products_file,
            hash_memory_kib,
            hash_iterations,
            hash_parallelism,
        })
    }
}

fn first_of<F>(lookup: &F, keys: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter().find_map(|k| lookup(k))
}

/// Parse a duration such as `3600`, `90s`, `30m`, `1h` or `7d`
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let invalid = || ShineStoreError::ConfigError(format!("Invalid duration: '{}'", raw));

    let (digits, multiplier) = match raw.chars().last() {
        Some('s') => (&raw[..raw.len() - 1], 1),
        Some('m') => (&raw[..raw.len() - 1], 60),
        Some('h') => (&raw[..raw.len() - 1], 3600),
        Some('d') => (&raw[..raw.len() - 1], 86_400),
        Some(c) if c.is_ascii_digit() => (raw, 1),
        _ => return Err(invalid()),
    };

    let value: u64 = digits.trim().parse().map_err(|_| invalid())?;
    value
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}
