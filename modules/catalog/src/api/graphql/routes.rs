use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    http::HeaderMap,
    response::{Html, IntoResponse},
    routing::get,
    Extension, Router,
};

use crate::api::graphql::guard::{SuppliedAdminKey, ADMIN_KEY_HEADER};
use crate::api::graphql::schema::CatalogSchema;

/// Mount the GraphQL endpoint (POST) and the GraphiQL IDE (GET) on `/graphql`.
pub fn register_routes(router: Router, schema: CatalogSchema) -> Router {
    router
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(Extension(schema))
}

/// Execute a GraphQL request, forwarding the admin-key header (if any) into
/// the request context so mutation resolvers can run the guard.
async fn graphql_handler(
    Extension(schema): Extension<CatalogSchema>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(key) = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        request = request.data(SuppliedAdminKey(key.to_string()));
    }
    schema.execute(request).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
