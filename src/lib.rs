//! Shine Store - authentication and product catalog API
//!
//! This library provides user registration and login with Argon2 password
//! hashes and signed session tokens, plus read-only product lookups over a
//! pluggable document store.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod security_logger;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
pub use error::{Result, ShineStoreError};
