//! Abstract storage interfaces for pluggable backends
//!
//! The service layer only talks to these traits; backends are constructed
//! at startup and injected, which also lets tests swap in doubles.

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::user::User;
use crate::error::Result;

/// Product documents are schemaless JSON objects carrying an `_id`
pub type ProductDocument = Value;

/// Field holding a product document's identifier
pub const PRODUCT_ID_FIELD: &str = "_id";

/// Credential store: user records keyed by email
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Find a user by exact (case-sensitive) email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert a new user.
    ///
    /// Implementations must enforce email uniqueness atomically and fail
    /// with `ShineStoreError::DuplicateUser` when the email is taken.
    async fn insert_user(&self, user: User) -> Result<()>;

    /// Number of stored users
    async fn count_users(&self) -> Result<usize>;
}

/// Read side of the product catalog
#[async_trait]
pub trait ProductStorage: Send + Sync {
    /// All product documents, in insertion order
    async fn find_all_products(&self) -> Result<Vec<ProductDocument>>;

    /// A single product document by `_id`
    async fn find_product_by_id(&self, id: &str) -> Result<Option<ProductDocument>>;

    /// Insert a product document, returning its `_id`
    async fn insert_product(&self, product: ProductDocument) -> Result<String>;
}
