//! Storage mechanisms for user credentials and the product catalog

pub mod memory;
pub mod traits;

// Re-export the storage interfaces and the in-memory backend
pub use memory::{MemoryProductStorage, MemoryUserStorage};
pub use traits::{ProductDocument, ProductStorage, UserStorage, PRODUCT_ID_FIELD};
