//! Registration and login orchestration
//!
//! The service owns no mutable state of its own: every request reads and
//! writes through the injected credential store, hashes on the blocking
//! pool and signs with the process-wide token manager.

use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::auth::password::PasswordHasher;
use crate::auth::token::{Claims, IdentityClaims, TokenManager};
use crate::auth::user::{User, UserProfile};
use crate::config::ServerConfig;
use crate::constants::{MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN};
use crate::error::{Result, ShineStoreError};
use crate::security_logger::{SecurityEvent, SecurityLogger};
use crate::storage::UserStorage;

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
}

pub struct AuthService {
    users: Arc<dyn UserStorage>,
    hasher: PasswordHasher,
    tokens: Arc<TokenManager>,
    security: Arc<SecurityLogger>,
    // Hash checked against when the email is unknown, so both failure paths cost the same
    decoy_hash: OnceCell<String>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStorage>,
        hasher: PasswordHasher,
        tokens: Arc<TokenManager>,
        security: Arc<SecurityLogger>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            security,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Build the service from configuration and an already-connected store
    pub fn from_config(
        config: &ServerConfig,
        users: Arc<dyn UserStorage>,
        security: Arc<SecurityLogger>,
    ) -> Result<Self> {
        let hasher = PasswordHasher::from_config(config)?;
        let tokens = Arc::new(TokenManager::new(&config.jwt_secret, config.token_ttl));
        Ok(Self::new(users, hasher, tokens, security))
    }

    /// Register a new account with the `user` role.
    ///
    /// Fails with `DuplicateUser` when the email is taken, either by the
    /// existence check or by the store's own uniqueness guarantee when two
    /// registrations race.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserProfile> {
        if let Err(e) = validate_registration(name, email, password) {
            self.security
                .log_event(SecurityEvent::InvalidInput {
                    input_type: "registration".to_string(),
                    details: e.to_string(),
                })
                .await;
            return Err(e);
        }

        if self.lookup(email, "find_user_by_email").await?.is_some() {
            self.reject_registration(email).await;
            return Err(ShineStoreError::DuplicateUser);
        }

        let password_hash = self.hasher.hash(password.to_string()).await?;
        let user = User::new(name.trim().to_string(), email.to_string(), password_hash);
        let profile = user.profile();

        match self.users.insert_user(user).await {
            Ok(()) => {}
            Err(ShineStoreError::DuplicateUser) => {
                self.reject_registration(email).await;
                return Err(ShineStoreError::DuplicateUser);
            }
            Err(e) => return Err(self.store_failure("insert_user", e).await),
        }

        self.security
            .log_event(SecurityEvent::UserRegistered {
                email: email.to_string(),
            })
            .await;

        Ok(profile)
    }

    /// Log in with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        self.login_from(email, password, None).await
    }

    /// Log in, recording the caller's address in security events.
    ///
    /// An unknown email and a wrong password both yield `InvalidCredentials`.
    pub async fn login_from(
        &self,
        email: &str,
        password: &str,
        ip: Option<IpAddr>,
    ) -> Result<LoginOutcome> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ShineStoreError::ValidationError(
                "Email and password are required".to_string(),
            ));
        }
        if email.len() > MAX_EMAIL_LEN || password.len() > MAX_PASSWORD_LEN {
            return Err(ShineStoreError::ValidationError(
                "Email or password too long".to_string(),
            ));
        }

        let user = match self.lookup(email, "find_user_by_email").await? {
            Some(user) => user,
            None => {
                let decoy = self.decoy_hash().await?;
                let _ = self.hasher.verify(password.to_string(), decoy).await;
                self.fail_login(email, ip, "unknown email").await;
                return Err(ShineStoreError::InvalidCredentials);
            }
        };

        if !self
            .hasher
            .verify(password.to_string(), user.password_hash.clone())
            .await
        {
            self.fail_login(email, ip, "password mismatch").await;
            return Err(ShineStoreError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(IdentityClaims::from(&user), self.tokens.default_ttl())?;

        self.security
            .log_event(SecurityEvent::AuthenticationSuccess {
                email: user.email.clone(),
                ip,
            })
            .await;

        Ok(LoginOutcome { token })
    }

    /// Verify a session token presented on a later request
    pub async fn authenticate(&self, token: &str, ip: Option<IpAddr>) -> Result<Claims> {
        match self.tokens.verify(token) {
            Ok(claims) => Ok(claims),
            Err(e) => {
                self.security
                    .log_event(SecurityEvent::TokenValidationFailed {
                        ip,
                        reason: e.to_string(),
                    })
                    .await;
                Err(e)
            }
        }
    }

    async fn lookup(&self, email: &str, operation: &str) -> Result<Option<User>> {
        match self.users.find_user_by_email(email).await {
            Ok(user) => Ok(user),
            Err(e) => Err(self.store_failure(operation, e).await),
        }
    }

    async fn decoy_hash(&self) -> Result<String> {
        self.decoy_hash
            .get_or_try_init(|| self.hasher.hash(uuid::Uuid::new_v4().to_string()))
            .await
            .cloned()
    }

    async fn reject_registration(&self, email: &str) {
        self.security
            .log_event(SecurityEvent::RegistrationRejected {
                email: email.to_string(),
                reason: "email already registered".to_string(),
            })
            .await;
    }

    async fn fail_login(&self, email: &str, ip: Option<IpAddr>, reason: &str) {
        self.security
            .log_event(SecurityEvent::AuthenticationFailed {
                email: email.to_string(),
                ip,
                reason: reason.to_string(),
            })
            .await;
    }

    async fn store_failure(&self, operation: &str, error: ShineStoreError) -> ShineStoreError {
        self.security
            .log_event(SecurityEvent::StoreFailure {
                operation: operation.to_string(),
                error: error.to_string(),
            })
            .await;

        match error {
            ShineStoreError::StoreUnavailable(_) => error,
            other => ShineStoreError::StoreUnavailable(other.to_string()),
        }
    }
}

/// Check registration input before touching the store
pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ShineStoreError::ValidationError("Name is required".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ShineStoreError::ValidationError(format!(
            "Name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    validate_email(email)?;
    if password.is_empty() {
        return Err(ShineStoreError::ValidationError("Password is required".to_string()));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(ShineStoreError::ValidationError(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Minimal shape check: one `@`, non-empty local part and domain, no whitespace
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(ShineStoreError::ValidationError("Email is required".to_string()));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(ShineStoreError::ValidationError(format!(
            "Email must be at most {} characters",
            MAX_EMAIL_LEN
        )));
    }

    let malformed = || ShineStoreError::ValidationError("Email is malformed".to_string());

    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(malformed());
    }

    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::user::UserRole;
    use crate::storage::MemoryUserStorage;
    use std::time::Duration;

    fn service() -> (AuthService, MemoryUserStorage, Arc<SecurityLogger>) {
        let storage = MemoryUserStorage::new();
        let security = SecurityLogger::shared();
        let service = AuthService::new(
            Arc::new(storage.clone()),
            PasswordHasher::with_params(1024, 1, 1).unwrap(),
            Arc::new(TokenManager::new(
                "service-test-key-with-at-least-32-bytes",
                Duration::from_secs(3600),
            )),
            security.clone(),
        );
        (service, storage, security)
    }

    #[tokio::test]
    async fn test_register_stores_hash_with_user_role() {
        let (service, storage, _) = service();
        let profile = service.register("Ana", "ana@x.com", "secret123").await.unwrap();
        assert_eq!(profile.role, UserRole::User);

        let stored = storage.find_user_by_email("ana@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret123");
        assert!(stored.password_hash.starts_with("$argon2id$"));
        assert_eq!(stored.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let (service, storage, security) = service();
        service.register("Ana", "ana@x.com", "secret123").await.unwrap();

        let second = service.register("Other Ana", "ana@x.com", "different").await;
        assert!(matches!(second, Err(ShineStoreError::DuplicateUser)));
        assert_eq!(storage.count_users().await.unwrap(), 1);

        let stats = security.get_event_stats().await;
        assert_eq!(stats.get("registration_rejected"), Some(&1));
    }

    #[tokio::test]
    async fn test_invalid_registration_does_not_touch_store() {
        let (service, storage, _) = service();
        for (name, email, password) in [
            ("", "ana@x.com", "secret123"),
            ("   ", "ana@x.com", "secret123"),
            ("Ana", "", "secret123"),
            ("Ana", "not-an-email", "secret123"),
            ("Ana", "ana@x.com", ""),
        ] {
            let result = service.register(name, email, password).await;
            assert!(matches!(result, Err(ShineStoreError::ValidationError(_))));
        }
        assert_eq!(storage.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let (service, _, _) = service();
        service.register("Ana", "ana@x.com", "secret123").await.unwrap();

        let outcome = service.login("ana@x.com", "secret123").await.unwrap();
        assert!(!outcome.token.is_empty());

        let claims = service.authenticate(&outcome.token, None).await.unwrap();
        assert_eq!(claims.email, "ana@x.com");
        assert_eq!(claims.name, "Ana");
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
        let (service, _, security) = service();
        service.register("Ana", "ana@x.com", "secret123").await.unwrap();

        let unknown = service.login("nobody@x.com", "secret123").await.unwrap_err();
        let wrong = service.login("ana@x.com", "wrong").await.unwrap_err();

        assert!(matches!(unknown, ShineStoreError::InvalidCredentials));
        assert!(matches!(wrong, ShineStoreError::InvalidCredentials));
        assert_eq!(unknown.kind(), wrong.kind());
        assert_eq!(unknown.public_message(), wrong.public_message());

        let stats = security.get_event_stats().await;
        assert_eq!(stats.get("auth_failed"), Some(&2));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_garbage() {
        let (service, _, security) = service();
        let result = service.authenticate("not.a.token", None).await;
        assert!(matches!(result, Err(ShineStoreError::TokenInvalid(_))));
        assert_eq!(
            security.get_event_stats().await.get("token_validation_failed"),
            Some(&1)
        );
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@x.com").is_ok());
        assert!(validate_email("a@b").is_ok());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("ana@").is_err());
        assert!(validate_email("ana@@x.com").is_err());
        assert!(validate_email("ana @x.com").is_err());
        assert!(validate_email(" ana@x.com").is_err());
        assert!(validate_email(&format!("{}@x.com", "a".repeat(MAX_EMAIL_LEN))).is_err());
    }
}
