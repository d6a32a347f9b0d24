use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account as held by the credential store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Display name
    pub name: String,
    /// Email address, unique across the store
    pub email: String,
    /// Argon2 PHC string, never leaves the service layer
    #[serde(rename = "password")]
    pub password_hash: String,
    pub role: UserRole,
    /// Account creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Creates a new account with the default `user` role
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            name,
            email,
            password_hash,
            role: UserRole::default(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Public view of the account, safe to return to callers
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Account fields that may be exposed outside the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}
