use thiserror::Error;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("Product not found: {id}")]
    NotFound { id: Uuid },

    #[error("Unauthorized: admin key missing or invalid")]
    Unauthorized,

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Internal error")]
    Internal,
}

impl CatalogError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<DomainError> for CatalogError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::ProductNotFound { id } => Self::NotFound { id },
            DomainError::EmptyName => Self::validation("name", "name cannot be empty"),
            DomainError::FieldTooLong { field, len, max } => Self::validation(
                field.clone(),
                format!("{field} too long: {len} characters (max: {max})"),
            ),
            DomainError::Database { .. } => Self::Internal,
        }
    }
}
