//! Core domain logic for the product catalog service.
//! This crate is the single source of truth for catalog invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::product::{Product, ProductId, ProductPatch, ProductValidationError};
pub use repo::product_repo::{
    ProductListQuery, ProductStore, RepoError, RepoResult, SqliteProductRepository,
};
pub use service::error::{CatalogError, CatalogResult};
pub use service::pagination::{Page, PageMeta, PageWindow};
pub use service::product_service::ProductService;
pub use service::validation::ValidationReport;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
