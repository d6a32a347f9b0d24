//! Read-only product catalog

use std::sync::Arc;

use crate::error::{Result, ShineStoreError};
use crate::storage::{ProductDocument, ProductStorage};

/// Pass-through reads over the product store
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductStorage>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductStorage>) -> Self {
        Self { products }
    }

    pub async fn list_products(&self) -> Result<Vec<ProductDocument>> {
        self.products
            .find_all_products()
            .await
            .map_err(|e| unavailable("find_all_products", e))
    }

    /// A product by id; unknown ids are `NotFound`
    pub async fn get_product(&self, id: &str) -> Result<ProductDocument> {
        self.products
            .find_product_by_id(id)
            .await
            .map_err(|e| unavailable("find_product_by_id", e))?
            .ok_or_else(|| ShineStoreError::NotFound("Product".to_string()))
    }
}

fn unavailable(operation: &str, error: ShineStoreError) -> ShineStoreError {
    log::error!("Product store {} failed: {}", operation, error);
    match error {
        ShineStoreError::StoreUnavailable(_) => error,
        other => ShineStoreError::StoreUnavailable(other.to_string()),
    }
}
