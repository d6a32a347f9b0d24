use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::user::{User, UserRole};
use crate::constants::MAX_TOKEN_LEN;
use crate::error::{Result, ShineStoreError};

/// Identity attributes carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl From<&User> for IdentityClaims {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    /// Issued at (as UTC timestamp)
    pub iat: i64,
    /// Expiration time (as UTC timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for an identity, valid for `ttl` from `now`
    pub fn new(identity: IdentityClaims, ttl: Duration, now: i64) -> Self {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            email: identity.email,
            name: identity.name,
            role: identity.role,
            iat: now,
            exp: now.saturating_add(ttl_secs),
        }
    }

    /// Check if the token is expired at `now`
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Identity part of the claims
    pub fn identity(&self) -> IdentityClaims {
        IdentityClaims {
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// Signs and verifies HS256 session tokens.
///
/// The secret is only ever used to build the keys; it never appears in a
/// token. Expiry is checked here rather than by `jsonwebtoken` so that a
/// zero TTL is already expired and no clock leeway applies.
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenManager {
    /// Creates a new token manager with a secret and a default lifetime
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issues a token valid for `ttl` from now
    pub fn issue(&self, identity: IdentityClaims, ttl: Duration) -> Result<String> {
        self.issue_at(identity, ttl, chrono::Utc::now().timestamp())
    }

    /// Issues a token valid for `ttl` from `now`
    pub fn issue_at(&self, identity: IdentityClaims, ttl: Duration, now: i64) -> Result<String> {
        let claims = Claims::new(identity, ttl, now);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ShineStoreError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token against the current time
    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verifies signature and payload, then rejects if `now >= exp`
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims> {
        if token.is_empty() || token.len() > MAX_TOKEN_LEN {
            return Err(ShineStoreError::TokenInvalid("Token length out of bounds".to_string()));
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| ShineStoreError::TokenInvalid(e.to_string()))?
            .claims;

        if claims.is_expired_at(now) {
            return Err(ShineStoreError::TokenExpired);
        }

        Ok(claims)
    }
}

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
