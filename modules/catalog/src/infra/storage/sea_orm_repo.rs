//! SeaORM-backed repository implementation for the domain port.
//!
//! This struct is generic over `C: ConnectionTrait`, so you can construct it
//! with a `DatabaseConnection` **or** a transactional connection.

use anyhow::Context;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::contract::model::Product;
use crate::domain::repo::ProductsRepository;
use crate::infra::storage::entity::{ActiveModel as ProductAM, Column, Entity as ProductEntity};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmProductsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmProductsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn to_active_model(p: Product) -> ProductAM {
    ProductAM {
        id: Set(p.id),
        name: Set(p.name),
        description: Set(p.description),
        price: Set(p.price),
        image_url: Set(p.image_url),
        category: Set(p.category),
        stock_quantity: Set(p.stock_quantity),
        is_active: Set(p.is_active),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

#[async_trait::async_trait]
impl<C> ProductsRepository for SeaOrmProductsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        let found = ProductEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, p: Product) -> anyhow::Result<()> {
        let m = to_active_model(p);
        let _ = m.insert(&self.conn).await.context("insert failed")?;
        Ok(())
    }

    async fn update(&self, p: Product) -> anyhow::Result<()> {
        let m = to_active_model(p);
        let _ = m.update(&self.conn).await.context("update failed")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = ProductEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Product>> {
        let rows = ProductEntity::find()
            .order_by_asc(Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("list_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
