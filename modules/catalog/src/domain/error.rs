use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Product not found: {id}")]
    ProductNotFound { id: Uuid },

    #[error("Product name cannot be empty")]
    EmptyName,

    #[error("{field} too long: {len} characters (max: {max})")]
    FieldTooLong {
        field: String,
        len: usize,
        max: usize,
    },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn product_not_found(id: Uuid) -> Self {
        Self::ProductNotFound { id }
    }

    pub fn empty_name() -> Self {
        Self::EmptyName
    }

    pub fn field_too_long(field: impl Into<String>, len: usize, max: usize) -> Self {
        Self::FieldTooLong {
            field: field.into(),
            len,
            max,
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
