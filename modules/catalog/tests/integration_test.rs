use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal_macros::dec;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;
use uuid::Uuid;

use catalog::{
    api::graphql::{build_schema, guard::SuppliedAdminKey, routes, AdminKeyGuard, CatalogSchema},
    contract::client::CatalogApi,
    contract::model::{NewProduct, ProductPatch},
    domain::service::{Service, ServiceConfig},
    gateways::local::CatalogLocalClient,
    infra::storage::migrations::Migrator,
    infra::storage::sea_orm_repo::SeaOrmProductsRepository,
};

const TEST_ADMIN_KEY: &str = "test-admin-key";

/// Create a fresh test database for each test.
/// A single pooled connection keeps the in-memory database alive and shared.
async fn create_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);

    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create a test domain service
async fn create_test_service() -> Arc<Service> {
    let db = create_test_db().await;
    let repo = SeaOrmProductsRepository::new(db);
    Arc::new(Service::new(Arc::new(repo), ServiceConfig::default()))
}

/// Create a test local client carrying the shared admin secret
async fn create_test_client() -> Arc<dyn CatalogApi> {
    let service = create_test_service().await;
    let guard = Arc::new(AdminKeyGuard::new(TEST_ADMIN_KEY));
    Arc::new(CatalogLocalClient::new(service, guard).with_admin_key(TEST_ADMIN_KEY))
}

/// Create a test GraphQL schema with the admin guard configured
async fn create_test_schema() -> CatalogSchema {
    let service = create_test_service().await;
    let guard = Arc::new(AdminKeyGuard::new(TEST_ADMIN_KEY));
    build_schema(service, guard)
}

/// Create a test HTTP router with the GraphQL endpoint mounted
async fn create_test_router() -> Router {
    let schema = create_test_schema().await;
    routes::register_routes(Router::new(), schema)
}

fn new_product(name: &str, price: rust_decimal::Decimal) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price,
        description: None,
        image_url: None,
        category: None,
        stock_quantity: None,
        is_active: None,
    }
}

/// POST a GraphQL request to the router, optionally with the admin-key header
async fn post_graphql(
    router: Router,
    query: &str,
    admin_key: Option<&str>,
) -> Result<serde_json::Value> {
    let body = serde_json::json!({ "query": query });

    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header("content-type", "application/json");
    if let Some(key) = admin_key {
        builder = builder.header("x-admin-key", key);
    }
    let request = builder.body(Body::from(serde_json::to_string(&body)?))?;

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn error_code(value: &serde_json::Value) -> Option<&str> {
    value["errors"][0]["extensions"]["code"].as_str()
}

// --- domain service ---

#[tokio::test]
async fn test_domain_service_crud() -> Result<()> {
    let service = create_test_service().await;

    // Create
    let created = service
        .create_product(NewProduct {
            name: "Bead Necklace".to_string(),
            price: dec!(45.99),
            description: Some("Hand-strung glass beads".to_string()),
            image_url: None,
            category: Some("necklaces".to_string()),
            stock_quantity: Some(3),
            is_active: Some(true),
        })
        .await?;
    assert_eq!(created.name, "Bead Necklace");
    assert_eq!(created.price, dec!(45.99));
    assert_eq!(created.stock_quantity, 3);

    // Get
    let retrieved = service.get_product(created.id).await?.expect("should exist");
    assert_eq!(retrieved.id, created.id);
    assert_eq!(retrieved.name, created.name);

    // List
    let products = service.list_products().await?;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, created.id);

    // Update
    let updated = service
        .update_product(
            created.id,
            ProductPatch {
                stock_quantity: Some(10),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.stock_quantity, 10);
    assert_eq!(updated.name, "Bead Necklace"); // Unchanged

    // Remove
    let snapshot = service.remove_product(created.id).await?;
    assert_eq!(snapshot.stock_quantity, 10);

    // Verify product is gone; a miss on read is absent, not an error
    let result = service.get_product(created.id).await?;
    assert!(result.is_none());

    Ok(())
}

#[tokio::test]
async fn test_create_applies_documented_defaults() -> Result<()> {
    let service = create_test_service().await;

    let created = service
        .create_product(new_product("Bead Necklace", dec!(45.99)))
        .await?;

    assert_eq!(created.stock_quantity, 1);
    assert!(created.is_active);
    assert_eq!(created.description, None);
    assert_eq!(created.image_url, None);
    assert_eq!(created.category, None);
    assert!(!created.id.is_nil());
    assert_eq!(created.created_at, created.updated_at);

    Ok(())
}

#[tokio::test]
async fn test_create_keeps_explicit_inactive_flag() -> Result<()> {
    let service = create_test_service().await;

    // Tri-state: an explicit false must not be replaced by the default
    let created = service
        .create_product(NewProduct {
            is_active: Some(false),
            stock_quantity: Some(0),
            ..new_product("Retired Pendant", dec!(9.99))
        })
        .await?;

    assert!(!created.is_active);
    assert_eq!(created.stock_quantity, 0);

    Ok(())
}

#[tokio::test]
async fn test_update_price_only_touches_price_and_updated_at() -> Result<()> {
    let service = create_test_service().await;

    let created = service
        .create_product(NewProduct {
            description: Some("Hand-strung glass beads".to_string()),
            category: Some("necklaces".to_string()),
            ..new_product("Bead Necklace", dec!(45.99))
        })
        .await?;

    // Make the clock advance measurably before the update
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let updated = service
        .update_product(
            created.id,
            ProductPatch {
                price: Some(dec!(39.99)),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.price, dec!(39.99));
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.image_url, created.image_url);
    assert_eq!(updated.category, created.category);
    assert_eq!(updated.stock_quantity, created.stock_quantity);
    assert_eq!(updated.is_active, created.is_active);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    Ok(())
}

#[tokio::test]
async fn test_update_and_remove_missing_id_yield_not_found() {
    let service = create_test_service().await;
    let missing = Uuid::new_v4();

    let update_result = service
        .update_product(
            missing,
            ProductPatch {
                price: Some(dec!(1.00)),
                ..Default::default()
            },
        )
        .await;
    match update_result {
        Err(catalog::domain::error::DomainError::ProductNotFound { id }) => {
            assert_eq!(id, missing)
        }
        other => panic!("Expected ProductNotFound, got {other:?}"),
    }

    let remove_result = service.remove_product(missing).await;
    match remove_result {
        Err(catalog::domain::error::DomainError::ProductNotFound { id }) => {
            assert_eq!(id, missing)
        }
        other => panic!("Expected ProductNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_reflects_removal() -> Result<()> {
    let service = create_test_service().await;

    let a = service.create_product(new_product("A", dec!(1.00))).await?;
    let b = service.create_product(new_product("B", dec!(2.00))).await?;

    service.remove_product(a.id).await?;

    let products = service.list_products().await?;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, b.id);
    assert_eq!(products[0].name, "B");

    Ok(())
}

#[tokio::test]
async fn test_round_trip_get_equals_create_output() -> Result<()> {
    let service = create_test_service().await;

    let created = service
        .create_product(NewProduct {
            description: Some("Hand-strung glass beads".to_string()),
            image_url: Some("https://cdn.example.com/necklace.jpg".to_string()),
            category: Some("necklaces".to_string()),
            stock_quantity: Some(4),
            is_active: Some(true),
            ..new_product("Bead Necklace", dec!(45.99))
        })
        .await?;

    let retrieved = service.get_product(created.id).await?.expect("should exist");
    assert_eq!(retrieved, created);

    Ok(())
}

#[tokio::test]
async fn test_validation_rejected_before_store_access() -> Result<()> {
    let service = create_test_service().await;

    let result = service.create_product(new_product("   ", dec!(5.00))).await;
    assert!(result.is_err());

    let too_long = "x".repeat(256);
    let result = service.create_product(new_product(&too_long, dec!(5.00))).await;
    assert!(result.is_err());

    // Nothing was written
    let products = service.list_products().await?;
    assert!(products.is_empty());

    Ok(())
}

/// The end-to-end scenario: create with defaults, restock, remove, verify gone.
#[tokio::test]
async fn test_bead_necklace_lifecycle() -> Result<()> {
    let service = create_test_service().await;

    let created = service
        .create_product(new_product("Bead Necklace", dec!(45.99)))
        .await?;
    assert_eq!(created.stock_quantity, 1);
    assert!(created.is_active);
    assert_eq!(created.description, None);

    let updated = service
        .update_product(
            created.id,
            ProductPatch {
                stock_quantity: Some(10),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.stock_quantity, 10);
    assert_eq!(updated.name, "Bead Necklace");

    let snapshot = service.remove_product(created.id).await?;
    assert_eq!(snapshot.stock_quantity, 10);

    assert!(service.get_product(created.id).await?.is_none());

    Ok(())
}

// --- local client ---

#[tokio::test]
async fn test_local_client() -> Result<()> {
    let client = create_test_client().await;

    let created = client
        .create_product(new_product("Bead Bracelet", dec!(19.50)))
        .await?;
    assert_eq!(created.name, "Bead Bracelet");

    let retrieved = client.get_product(created.id).await?.expect("should exist");
    assert_eq!(retrieved.id, created.id);

    let products = client.list_products().await?;
    assert_eq!(products.len(), 1);

    let updated = client
        .update_product(
            created.id,
            ProductPatch {
                name: Some("Glass Bead Bracelet".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.name, "Glass Bead Bracelet");

    let snapshot = client.remove_product(created.id).await?;
    assert_eq!(snapshot.name, "Glass Bead Bracelet");

    Ok(())
}

#[tokio::test]
async fn test_local_client_without_key_cannot_mutate() -> Result<()> {
    let service = create_test_service().await;
    let guard = Arc::new(AdminKeyGuard::new(TEST_ADMIN_KEY));
    let client = CatalogLocalClient::new(service, guard);

    let result = client
        .create_product(new_product("Bead Necklace", dec!(45.99)))
        .await;
    match result {
        Err(catalog::contract::error::CatalogError::Unauthorized) => {}
        other => panic!("Expected Unauthorized, got {other:?}"),
    }

    // Nothing was written, and reads stay open
    let products = client.list_products().await?;
    assert!(products.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_local_client_with_wrong_key_cannot_mutate() {
    let service = create_test_service().await;
    let guard = Arc::new(AdminKeyGuard::new(TEST_ADMIN_KEY));
    let client = CatalogLocalClient::new(service, guard).with_admin_key("wrong-key");

    let result = client.remove_product(Uuid::new_v4()).await;
    match result {
        Err(catalog::contract::error::CatalogError::Unauthorized) => {}
        other => panic!("Expected Unauthorized, got {other:?}"),
    }
}

// --- GraphQL API ---

#[tokio::test]
async fn test_graphql_reads_are_unauthenticated() -> Result<()> {
    let router = create_test_router().await;

    let value = post_graphql(router, "{ products { id name } }", None).await?;

    assert!(value["errors"].is_null(), "reads must not require the key");
    assert_eq!(value["data"]["products"], serde_json::json!([]));

    Ok(())
}

#[tokio::test]
async fn test_graphql_get_missing_product_is_null_not_error() -> Result<()> {
    let router = create_test_router().await;

    let query = format!(r#"{{ product(id: "{}") {{ id }} }}"#, Uuid::new_v4());
    let value = post_graphql(router, &query, None).await?;

    assert!(value["errors"].is_null());
    assert!(value["data"]["product"].is_null());

    Ok(())
}

#[tokio::test]
async fn test_graphql_mutation_without_key_is_unauthorized_and_writes_nothing() -> Result<()> {
    let router = create_test_router().await;

    let mutation = r#"mutation {
        createProduct(input: { name: "Bead Necklace", price: "45.99" }) { id }
    }"#;

    let value = post_graphql(router.clone(), mutation, None).await?;
    assert_eq!(error_code(&value), Some("UNAUTHORIZED"));

    // No row was written
    let value = post_graphql(router, "{ products { id } }", None).await?;
    assert_eq!(value["data"]["products"], serde_json::json!([]));

    Ok(())
}

#[tokio::test]
async fn test_graphql_mutation_with_wrong_key_is_unauthorized() -> Result<()> {
    let router = create_test_router().await;

    let mutation = r#"mutation {
        createProduct(input: { name: "Bead Necklace", price: "45.99" }) { id }
    }"#;

    let value = post_graphql(router.clone(), mutation, Some("wrong-key")).await?;
    assert_eq!(error_code(&value), Some("UNAUTHORIZED"));

    let value = post_graphql(router, "{ products { id } }", None).await?;
    assert_eq!(value["data"]["products"], serde_json::json!([]));

    Ok(())
}

#[tokio::test]
async fn test_graphql_create_with_key_applies_defaults() -> Result<()> {
    let router = create_test_router().await;

    let mutation = r#"mutation {
        createProduct(input: { name: "Bead Necklace", price: "45.99" }) {
            id
            name
            description
            stockQuantity
            isActive
        }
    }"#;

    let value = post_graphql(router.clone(), mutation, Some(TEST_ADMIN_KEY)).await?;
    assert!(value["errors"].is_null(), "errors: {}", value["errors"]);

    let created = &value["data"]["createProduct"];
    assert_eq!(created["name"], "Bead Necklace");
    assert_eq!(created["stockQuantity"], 1);
    assert_eq!(created["isActive"], true);
    assert!(created["description"].is_null());

    // The new row is visible to unauthenticated reads
    let value = post_graphql(router, "{ products { name } }", None).await?;
    assert_eq!(value["data"]["products"][0]["name"], "Bead Necklace");

    Ok(())
}

#[tokio::test]
async fn test_graphql_update_missing_id_is_not_found() -> Result<()> {
    let router = create_test_router().await;

    let mutation = format!(
        r#"mutation {{
            updateProduct(input: {{ id: "{}", stockQuantity: 10 }}) {{ id }}
        }}"#,
        Uuid::new_v4()
    );

    let value = post_graphql(router, &mutation, Some(TEST_ADMIN_KEY)).await?;
    assert_eq!(error_code(&value), Some("NOT_FOUND"));

    Ok(())
}

#[tokio::test]
async fn test_graphql_remove_returns_pre_deletion_snapshot() -> Result<()> {
    let router = create_test_router().await;

    let create = r#"mutation {
        createProduct(input: { name: "Bead Necklace", price: "45.99", stockQuantity: 10 }) { id }
    }"#;
    let value = post_graphql(router.clone(), create, Some(TEST_ADMIN_KEY)).await?;
    let id = value["data"]["createProduct"]["id"]
        .as_str()
        .expect("id should be present")
        .to_string();

    let remove = format!(
        r#"mutation {{ removeProduct(id: "{id}") {{ id name stockQuantity }} }}"#
    );
    let value = post_graphql(router.clone(), &remove, Some(TEST_ADMIN_KEY)).await?;
    assert!(value["errors"].is_null());
    assert_eq!(value["data"]["removeProduct"]["stockQuantity"], 10);
    assert_eq!(value["data"]["removeProduct"]["name"], "Bead Necklace");

    // Second remove of the same id is NotFound, not success
    let value = post_graphql(router, &remove, Some(TEST_ADMIN_KEY)).await?;
    assert_eq!(error_code(&value), Some("NOT_FOUND"));

    Ok(())
}

#[tokio::test]
async fn test_graphql_validation_failure_carries_field_detail() -> Result<()> {
    let router = create_test_router().await;

    let mutation = r#"mutation {
        createProduct(input: { name: "", price: "5.00" }) { id }
    }"#;

    let value = post_graphql(router, mutation, Some(TEST_ADMIN_KEY)).await?;
    assert_eq!(error_code(&value), Some("BAD_USER_INPUT"));
    assert_eq!(value["errors"][0]["extensions"]["field"], "name");

    Ok(())
}

#[tokio::test]
async fn test_graphql_admin_header_name_is_case_insensitive() -> Result<()> {
    let router = create_test_router().await;

    let mutation = r#"mutation {
        createProduct(input: { name: "Bead Ring", price: "12.00" }) { id }
    }"#;

    let body = serde_json::json!({ "query": mutation });
    let request = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header("content-type", "application/json")
        .header("X-Admin-Key", TEST_ADMIN_KEY)
        .body(Body::from(serde_json::to_string(&body)?))?;

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert!(value["errors"].is_null(), "errors: {}", value["errors"]);

    Ok(())
}

#[tokio::test]
async fn test_schema_level_mutation_with_context_key() -> Result<()> {
    let schema = create_test_schema().await;

    let request = async_graphql::Request::new(
        r#"mutation {
            createProduct(input: { name: "Bead Anklet", price: "14.25" }) { id isActive }
        }"#,
    )
    .data(SuppliedAdminKey(TEST_ADMIN_KEY.to_string()));

    let response = schema.execute(request).await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);

    let value = serde_json::to_value(&response)?;
    assert_eq!(value["data"]["createProduct"]["isActive"], true);

    Ok(())
}
