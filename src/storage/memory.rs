//! In-memory storage implementation for development and testing
//!
//! Keeps all data in memory behind tokio locks. The user map is keyed by
//! email and insertion happens under the write lock, which gives the same
//! guarantee as a unique index on email.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::*;
use crate::auth::user::User;
use crate::error::{Result, ShineStoreError};

/// In-memory credential store
#[derive(Clone, Default)]
pub struct MemoryUserStorage {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl MemoryUserStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStorage for MemoryUserStorage {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<()> {
        match self.users.write().await.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(ShineStoreError::DuplicateUser),
            Entry::Vacant(slot) => {
                slot.insert(user);
                Ok(())
            }
        }
    }

    async fn count_users(&self) -> Result<usize> {
        Ok(self.users.read().await.len())
    }
}

/// In-memory product catalog
#[derive(Clone, Default)]
pub struct MemoryProductStorage {
    products: Arc<RwLock<Vec<ProductDocument>>>,
}

impl MemoryProductStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a JSON array of product documents
    pub async fn from_documents(documents: Vec<ProductDocument>) -> Result<Self> {
        let storage = Self::new();
        for document in documents {
            storage.insert_product(document).await?;
        }
        Ok(storage)
    }

    /// Build a catalog from a file holding a JSON array of product documents
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            ShineStoreError::StoreUnavailable(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let documents: Vec<ProductDocument> = serde_json::from_str(&raw).map_err(|e| {
            ShineStoreError::StoreUnavailable(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        Self::from_documents(documents).await
    }
}

fn document_id(document: &ProductDocument) -> Option<String> {
    match document.get(PRODUCT_ID_FIELD)? {
        Value::String(id) => Some(id.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl ProductStorage for MemoryProductStorage {
    async fn find_all_products(&self) -> Result<Vec<ProductDocument>> {
        Ok(self.products.read().await.clone())
    }

    async fn find_product_by_id(&self, id: &str) -> Result<Option<ProductDocument>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .find(|doc| document_id(doc).as_deref() == Some(id))
            .cloned())
    }

    async fn insert_product(&self, mut product: ProductDocument) -> Result<String> {
        let object = product.as_object_mut().ok_or_else(|| {
            ShineStoreError::ValidationError("Product document must be a JSON object".to_string())
        })?;

        let mut products = self.products.write().await;

        let id = match object.get(PRODUCT_ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                return Err(ShineStoreError::ValidationError(
                    "Product _id must be a string or number".to_string(),
                ))
            }
            None => {
                let id = uuid::Uuid::new_v4().simple().to_string();
                object.insert(PRODUCT_ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        if products.iter().any(|doc| document_id(doc).as_deref() == Some(id.as_str())) {
            return Err(ShineStoreError::ValidationError(format!(
                "Duplicate product _id: {}",
                id
            )));
        }

        products.push(product);
        Ok(id)
    }
}
