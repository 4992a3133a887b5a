use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::graphql::guard::AdminKeyGuard;
use crate::contract::{
    client::CatalogApi,
    error::CatalogError,
    model::{NewProduct, Product, ProductPatch},
};
use crate::domain::service::Service;

/// Local implementation of the CatalogApi trait that delegates to the domain
/// service and normalizes results into contract models.
///
/// Mutations run the same admin guard as the HTTP surface: the client carries
/// the credential it was constructed with, and a client without one (or with
/// a wrong one) can only read.
pub struct CatalogLocalClient {
    service: Arc<Service>,
    guard: Arc<AdminKeyGuard>,
    admin_key: Option<String>,
}

impl CatalogLocalClient {
    /// A read-only client: no credential, so every mutation is rejected.
    pub fn new(service: Arc<Service>, guard: Arc<AdminKeyGuard>) -> Self {
        Self {
            service,
            guard,
            admin_key: None,
        }
    }

    /// Attach the shared admin secret this client supplies on mutations.
    pub fn with_admin_key(mut self, key: impl Into<String>) -> Self {
        self.admin_key = Some(key.into());
        self
    }

    fn authorize(&self) -> Result<(), CatalogError> {
        self.guard.authorize(self.admin_key.as_deref())
    }
}

#[async_trait]
impl CatalogApi for CatalogLocalClient {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.service.list_products().await.map_err(Into::into)
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
        self.service.get_product(id).await.map_err(Into::into)
    }

    async fn create_product(&self, new_product: NewProduct) -> Result<Product, CatalogError> {
        self.authorize()?;
        self.service
            .create_product(new_product)
            .await
            .map_err(Into::into)
    }

    async fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<Product, CatalogError> {
        self.authorize()?;
        self.service
            .update_product(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn remove_product(&self, id: Uuid) -> Result<Product, CatalogError> {
        self.authorize()?;
        self.service.remove_product(id).await.map_err(Into::into)
    }
}
