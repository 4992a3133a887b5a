use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::contract::model::{NewProduct, Product, ProductPatch};

/// GraphQL representation of a catalog product
#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Product")]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product; omitted optional fields take defaults
#[derive(InputObject, Debug, Clone)]
pub struct CreateProductInput {
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
}

/// Input for a partial update; omitted fields keep their prior value
#[derive(InputObject, Debug, Clone)]
pub struct UpdateProductInput {
    pub id: Uuid,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
}

// Conversion implementations between GraphQL DTOs and contract models

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            image_url: p.image_url,
            category: p.category,
            stock_quantity: p.stock_quantity,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<CreateProductInput> for NewProduct {
    fn from(input: CreateProductInput) -> Self {
        Self {
            name: input.name,
            price: input.price,
            description: input.description,
            image_url: input.image_url,
            category: input.category,
            stock_quantity: input.stock_quantity,
            is_active: input.is_active,
        }
    }
}

impl From<UpdateProductInput> for ProductPatch {
    fn from(input: UpdateProductInput) -> Self {
        Self {
            name: input.name,
            price: input.price,
            description: input.description,
            image_url: input.image_url,
            category: input.category,
            stock_quantity: input.stock_quantity,
            is_active: input.is_active,
        }
    }
}
