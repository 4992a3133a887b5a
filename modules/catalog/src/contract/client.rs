use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::CatalogError,
    model::{NewProduct, Product, ProductPatch},
};

/// Public API trait for the catalog module that other modules can use
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// List all products in insertion order
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Get a product by ID. A missing row is `None`, not an error.
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, CatalogError>;

    /// Create a new product
    async fn create_product(&self, new_product: NewProduct) -> Result<Product, CatalogError>;

    /// Update a product with partial data
    async fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<Product, CatalogError>;

    /// Remove a product by ID, returning the snapshot as it existed before deletion
    async fn remove_product(&self, id: Uuid) -> Result<Product, CatalogError>;
}
