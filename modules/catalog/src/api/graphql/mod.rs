pub mod dto;
pub mod guard;
pub mod routes;
pub mod schema;

pub use guard::{AdminKeyGuard, ADMIN_KEY_HEADER};
pub use schema::{build_schema, CatalogSchema};
