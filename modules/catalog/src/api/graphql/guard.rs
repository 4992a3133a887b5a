use crate::contract::error::CatalogError;

/// Request header carrying the shared admin secret. Header names are matched
/// case-insensitively by the HTTP layer.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Admin key as supplied by the current request, extracted from the transport
/// headers and stashed in the GraphQL context.
#[derive(Debug, Clone)]
pub struct SuppliedAdminKey(pub String);

/// Shared-secret check gating every mutation.
///
/// The expected secret is injected once at construction, not read per request.
pub struct AdminKeyGuard {
    expected: String,
}

impl AdminKeyGuard {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    /// Byte-for-byte comparison of the supplied key against the configured
    /// secret. An empty configured secret never matches anything, including
    /// an empty supplied value.
    pub fn authorize(&self, supplied: Option<&str>) -> Result<(), CatalogError> {
        if self.expected.is_empty() {
            return Err(CatalogError::unauthorized());
        }
        match supplied {
            Some(key) if !key.is_empty() && key.as_bytes() == self.expected.as_bytes() => Ok(()),
            _ => Err(CatalogError::unauthorized()),
        }
    }
}
