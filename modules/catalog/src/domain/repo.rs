use crate::contract::model::Product;
use async_trait::async_trait;
use uuid::Uuid;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Load a product by id.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Product>>;
    /// Insert a fully-formed domain product.
    ///
    /// Service computes id/timestamps/defaults; repo persists.
    async fn insert(&self, p: Product) -> anyhow::Result<()>;
    /// Update an existing product (by primary key in `p.id`).
    async fn update(&self, p: Product) -> anyhow::Result<()>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    /// List all products in insertion order.
    async fn list_all(&self) -> anyhow::Result<Vec<Product>>;
}
