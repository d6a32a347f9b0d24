//! Authentication: password hashing, session tokens and the auth service

pub mod password;
pub mod service;
pub mod token;
pub mod user;

// Re-export main components
pub use password::PasswordHasher;
pub use service::{AuthService, LoginOutcome};
pub use token::{Claims, IdentityClaims, TokenManager};
pub use user::{User, UserProfile, UserRole};
