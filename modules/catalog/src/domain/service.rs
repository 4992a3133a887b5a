use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{NewProduct, Product, ProductPatch};
use crate::domain::error::DomainError;
use crate::domain::repo::ProductsRepository;

/// Price scale: two fractional digits, set on every write.
const PRICE_SCALE: u32 = 2;

/// Domain service with business rules for the product catalog.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ProductsRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub max_image_url_length: usize,
    pub max_category_length: usize,
    /// Stock assigned when a create request omits the quantity.
    pub default_stock_quantity: i32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 255,
            max_image_url_length: 512,
            max_category_length: 100,
            default_stock_quantity: 1,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(repo: Arc<dyn ProductsRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(name = "catalog.service.list_products", skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        debug!("Listing all products");

        let products = self
            .repo
            .list_all()
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        debug!("Successfully listed {} products", products.len());
        Ok(products)
    }

    /// A miss is an absent value, not an error; callers decide how to surface it.
    #[instrument(name = "catalog.service.get_product", skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        debug!("Getting product by id");

        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    #[instrument(
        name = "catalog.service.create_product",
        skip(self),
        fields(name = %new_product.name)
    )]
    pub async fn create_product(&self, new_product: NewProduct) -> Result<Product, DomainError> {
        info!("Creating new product");

        // Validate input before any store access
        self.validate_new_product(&new_product)?;

        let now = Utc::now();
        let id = Uuid::new_v4();
        let mut price = new_product.price;
        price.rescale(PRICE_SCALE);

        let product = Product {
            id,
            name: new_product.name,
            description: new_product.description,
            price,
            image_url: new_product.image_url,
            category: new_product.category,
            stock_quantity: new_product
                .stock_quantity
                .unwrap_or(self.config.default_stock_quantity),
            is_active: new_product.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(product.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully created product with id={}", product.id);
        Ok(product)
    }

    #[instrument(
        name = "catalog.service.update_product",
        skip(self),
        fields(product_id = %id)
    )]
    pub async fn update_product(
        &self,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<Product, DomainError> {
        info!("Updating product");

        // Validate patch before any store access
        self.validate_product_patch(&patch)?;

        // Load current; the only failure path of the contract is a missing row
        let mut current = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::product_not_found(id))?;

        // Apply patch field-by-field; absent fields keep their prior value
        if let Some(name) = patch.name {
            current.name = name;
        }
        if let Some(mut price) = patch.price {
            price.rescale(PRICE_SCALE);
            current.price = price;
        }
        if let Some(description) = patch.description {
            current.description = Some(description);
        }
        if let Some(image_url) = patch.image_url {
            current.image_url = Some(image_url);
        }
        if let Some(category) = patch.category {
            current.category = Some(category);
        }
        if let Some(stock_quantity) = patch.stock_quantity {
            current.stock_quantity = stock_quantity;
        }
        if let Some(is_active) = patch.is_active {
            current.is_active = is_active;
        }
        current.updated_at = Utc::now();

        self.repo
            .update(current.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully updated product");
        Ok(current)
    }

    #[instrument(
        name = "catalog.service.remove_product",
        skip(self),
        fields(product_id = %id)
    )]
    pub async fn remove_product(&self, id: Uuid) -> Result<Product, DomainError> {
        info!("Removing product");

        // Snapshot first so the caller receives the row as it existed
        let existing = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::product_not_found(id))?;

        self.repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully removed product");
        Ok(existing)
    }

    // --- validation helpers ---

    fn validate_new_product(&self, new_product: &NewProduct) -> Result<(), DomainError> {
        self.validate_name(&new_product.name)?;
        self.validate_optional_bounds(
            new_product.image_url.as_deref(),
            new_product.category.as_deref(),
        )
    }

    fn validate_product_patch(&self, patch: &ProductPatch) -> Result<(), DomainError> {
        if let Some(ref name) = patch.name {
            self.validate_name(name)?;
        }
        self.validate_optional_bounds(patch.image_url.as_deref(), patch.category.as_deref())
    }

    fn validate_name(&self, name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::empty_name());
        }
        if name.len() > self.config.max_name_length {
            return Err(DomainError::field_too_long(
                "name",
                name.len(),
                self.config.max_name_length,
            ));
        }
        Ok(())
    }

    fn validate_optional_bounds(
        &self,
        image_url: Option<&str>,
        category: Option<&str>,
    ) -> Result<(), DomainError> {
        if let Some(url) = image_url {
            if url.len() > self.config.max_image_url_length {
                return Err(DomainError::field_too_long(
                    "image_url",
                    url.len(),
                    self.config.max_image_url_length,
                ));
            }
        }
        if let Some(cat) = category {
            if cat.len() > self.config.max_category_length {
                return Err(DomainError::field_too_long(
                    "category",
                    cat.len(),
                    self.config.max_category_length,
                ));
            }
        }
        Ok(())
    }
}
