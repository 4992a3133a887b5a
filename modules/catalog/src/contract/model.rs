use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Pure product model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Unit price with two fractional digits.
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new product.
///
/// `name` and `price` are required; every other field defaults when `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: Option<i32>,
    /// Tri-state: absent means "use the default", not "false".
    pub is_active: Option<bool>,
}

/// Partial update data for a product. Absent fields keep their prior value;
/// absence never means "clear to null".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
}
