//! Catalog error taxonomy shared by lifecycle, pagination and validation.

use crate::model::product::ProductId;
use crate::repo::product_repo::RepoError;
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Client-error status used for domain failures.
pub const STATUS_BAD_REQUEST: u16 = 400;
/// Server-error status used for store failures.
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Errors surfaced by catalog operations.
///
/// Domain kinds are raised at the point of detection and propagate unchanged.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No available product with this id.
    #[error("Product with id {0} not found")]
    NotFound(ProductId),
    /// Bulk validation resolved fewer products than requested.
    #[error("Some products were not found")]
    SomeNotFound,
    /// Page or limit below 1.
    #[error("invalid pagination: page={page} limit={limit}, both must be at least 1")]
    InvalidPagination { page: u32, limit: u32 },
    /// Record store failure.
    #[error(transparent)]
    Store(#[from] RepoError),
}

impl CatalogError {
    /// Status code the transport should attach to this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::SomeNotFound | Self::InvalidPagination { .. } => {
                STATUS_BAD_REQUEST
            }
            Self::Store(RepoError::Validation(_)) => STATUS_BAD_REQUEST,
            Self::Store(_) => STATUS_INTERNAL_ERROR,
        }
    }

    /// Stable machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "product_not_found",
            Self::SomeNotFound => "some_products_not_found",
            Self::InvalidPagination { .. } => "invalid_pagination",
            Self::Store(_) => "store_failure",
        }
    }
}
