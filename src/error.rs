use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ShineStoreError {
    // Input errors
    ValidationError(String),

    // Auth errors
    DuplicateUser,
    InvalidCredentials,
    TokenInvalid(String),
    TokenExpired,

    // Storage errors
    StoreUnavailable(String),
    NotFound(String),

    // System errors
    HashingError(String),
    ConfigError(String),
    Internal(String),
}

impl fmt::Display for ShineStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::DuplicateUser => write!(f, "User already exists"),
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::TokenInvalid(msg) => write!(f, "Invalid token: {}", msg),
            Self::TokenExpired => write!(f, "Token expired"),
            Self::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
            Self::NotFound(what) => write!(f, "Not found: {}", what),
            Self::HashingError(msg) => write!(f, "Password hashing error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl Error for ShineStoreError {}

impl ShineStoreError {
    /// Stable machine-readable kind reported to API callers.
    ///
    /// Token failures are distinguishable internally but collapse to a
    /// single `unauthorized` kind at the boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "validation_error",
            Self::DuplicateUser => "duplicate_user",
            Self::InvalidCredentials => "invalid_credentials",
            Self::TokenInvalid(_) | Self::TokenExpired => "unauthorized",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::NotFound(_) => "not_found",
            Self::HashingError(_) | Self::ConfigError(_) | Self::Internal(_) => "internal_error",
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError(_) | Self::DuplicateUser => 400,
            Self::InvalidCredentials | Self::TokenInvalid(_) | Self::TokenExpired => 401,
            Self::NotFound(_) => 404,
            Self::StoreUnavailable(_)
            | Self::HashingError(_)
            | Self::ConfigError(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Message safe to hand back to a caller. Never includes store or
    /// hashing internals.
    pub fn public_message(&self) -> String {
        match self {
            Self::ValidationError(msg) => msg.clone(),
            Self::DuplicateUser => "User already exists".to_string(),
            Self::InvalidCredentials => "Invalid email or password".to_string(),
            Self::TokenInvalid(_) | Self::TokenExpired => "Unauthorized".to_string(),
            Self::NotFound(what) => format!("{} not found", what),
            Self::StoreUnavailable(_)
            | Self::HashingError(_)
            | Self::ConfigError(_)
            | Self::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// Whether the error is an internal failure that should be logged in detail
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}

// Blocking tasks that panic or get cancelled surface as hashing failures
impl From<tokio::task::JoinError> for ShineStoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        ShineStoreError::HashingError(format!("Hashing task failed: {}", err))
    }
}

// Generic result type for Shine Store
pub type Result<T> = std::result::Result<T, ShineStoreError>;
