use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Result, Schema};
use tracing::error;
use uuid::Uuid;

use crate::api::graphql::dto::{CreateProductInput, ProductDto, UpdateProductInput};
use crate::api::graphql::guard::{AdminKeyGuard, SuppliedAdminKey};
use crate::contract::error::CatalogError;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the executable schema with the domain service and the admin guard
/// wired into the context data.
pub fn build_schema(service: Arc<Service>, guard: Arc<AdminKeyGuard>) -> CatalogSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .data(guard)
        .finish()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All products, in insertion order.
    async fn products(&self, ctx: &Context<'_>) -> Result<Vec<ProductDto>> {
        let svc = ctx.data_unchecked::<Arc<Service>>();
        let products = svc.list_products().await.map_err(graphql_error)?;
        Ok(products.into_iter().map(Into::into).collect())
    }

    /// A single product by id, or null when no row matches.
    async fn product(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<ProductDto>> {
        let svc = ctx.data_unchecked::<Arc<Service>>();
        let product = svc.get_product(id).await.map_err(graphql_error)?;
        Ok(product.map(Into::into))
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_product(
        &self,
        ctx: &Context<'_>,
        input: CreateProductInput,
    ) -> Result<ProductDto> {
        authorize(ctx)?;

        let svc = ctx.data_unchecked::<Arc<Service>>();
        let product = svc
            .create_product(input.into())
            .await
            .map_err(graphql_error)?;
        Ok(product.into())
    }

    async fn update_product(
        &self,
        ctx: &Context<'_>,
        input: UpdateProductInput,
    ) -> Result<ProductDto> {
        authorize(ctx)?;

        let svc = ctx.data_unchecked::<Arc<Service>>();
        let id = input.id;
        let product = svc
            .update_product(id, input.into())
            .await
            .map_err(graphql_error)?;
        Ok(product.into())
    }

    /// Removes a product and returns its pre-deletion snapshot.
    async fn remove_product(&self, ctx: &Context<'_>, id: Uuid) -> Result<ProductDto> {
        authorize(ctx)?;

        let svc = ctx.data_unchecked::<Arc<Service>>();
        let product = svc.remove_product(id).await.map_err(graphql_error)?;
        Ok(product.into())
    }
}

/// Check the request's admin key before any service call. Reads stay open.
fn authorize(ctx: &Context<'_>) -> Result<()> {
    let guard = ctx.data_unchecked::<Arc<AdminKeyGuard>>();
    let supplied = ctx.data_opt::<SuppliedAdminKey>().map(|k| k.0.as_str());
    guard.authorize(supplied).map_err(contract_error)
}

fn graphql_error(err: DomainError) -> async_graphql::Error {
    if let DomainError::Database { ref message } = err {
        error!("Catalog store failure: {}", message);
    }
    contract_error(err.into())
}

/// Attach a machine-readable `code` extension so callers can tell the failure
/// outcomes apart without parsing messages.
fn contract_error(err: CatalogError) -> async_graphql::Error {
    let code = match &err {
        CatalogError::NotFound { .. } => "NOT_FOUND",
        CatalogError::Unauthorized => "UNAUTHORIZED",
        CatalogError::Validation { .. } => "BAD_USER_INPUT",
        CatalogError::Internal => "INTERNAL",
    };
    let field = match &err {
        CatalogError::Validation { field, .. } => Some(field.clone()),
        _ => None,
    };

    async_graphql::Error::new(err.to_string()).extend_with(|_, e| {
        e.set("code", code);
        if let Some(f) = &field {
            e.set("field", f.as_str());
        }
    })
}
