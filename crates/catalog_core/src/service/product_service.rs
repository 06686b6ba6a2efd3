//! Product catalog use-case service.
//!
//! # Responsibility
//! - Enforce the availability lifecycle: soft delete, no restore.
//! - Run pagination and bulk validation over the injected record store.
//!
//! # Invariants
//! - Every public read resolves through the visibility predicate first.
//! - `update` and `remove` look the product up before writing, so both fail
//!   with `NotFound` for unknown or soft-deleted ids.
//! - The service holds no state besides its store handle.

use crate::model::product::{Product, ProductId, ProductPatch};
use crate::repo::product_repo::{ProductListQuery, ProductStore};
use crate::service::error::{CatalogError, CatalogResult};
use crate::service::pagination::{Page, PageWindow};
use crate::service::validation::{dedup_ids, ValidationReport};
use log::{debug, info, warn};
use rust_decimal::Decimal;

/// Catalog service over an injected record store.
pub struct ProductService<S: ProductStore> {
    store: S,
}

impl<S: ProductStore> ProductService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Inserts a new available product and returns the stored record.
    ///
    /// Not idempotent: each call inserts a new record.
    pub fn create(&self, name: impl Into<String>, price: Decimal) -> CatalogResult<Product> {
        let product = Product::new(name, price);
        let id = self.store.create_product(&product)?;
        info!("event=product_create module=service status=ok product_id={id}");
        self.find_one(id)
    }

    /// Gets one available product.
    ///
    /// Soft-deleted products are indistinguishable from missing ones.
    pub fn find_one(&self, id: ProductId) -> CatalogResult<Product> {
        match self.store.get_product(id, false)? {
            Some(product) if product.is_visible() => Ok(product),
            _ => {
                debug!("event=product_get module=service status=not_found product_id={id}");
                Err(CatalogError::NotFound(id))
            }
        }
    }

    /// Merges `patch` into an available product and persists it.
    ///
    /// Returns the stored record, so a soft delete that landed between the
    /// lookup and the write shows up as `available: false`.
    pub fn update(&self, id: ProductId, patch: ProductPatch) -> CatalogResult<Product> {
        let mut product = self.find_one(id)?;
        product.apply(patch);
        self.store.update_product(&product)?;
        info!("event=product_update module=service status=ok product_id={id}");
        self.store
            .get_product(id, true)?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Soft-deletes an available product and returns the now-unavailable record.
    pub fn remove(&self, id: ProductId) -> CatalogResult<Product> {
        let mut product = self.find_one(id)?;
        product.soft_delete();
        self.store.update_product(&product)?;
        info!("event=product_remove module=service status=ok product_id={id}");
        Ok(product)
    }

    /// Lists one page of available products ordered by id.
    pub fn find_all(&self, page: u32, limit: u32) -> CatalogResult<Page> {
        let window = PageWindow::new(page, limit)?;
        let total_count = self.store.count_products(false)?;
        let data = self.store.list_products(&ProductListQuery {
            include_unavailable: false,
            limit: Some(window.limit()),
            offset: window.offset(),
        })?;

        Ok(Page {
            data,
            meta: window.meta(total_count),
        })
    }

    /// Confirms every requested id resolves to an available product.
    ///
    /// Duplicates are ignored. Fails with a single `SomeNotFound` when any id
    /// is missing or soft-deleted.
    pub fn validate_products(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>> {
        let requested = dedup_ids(ids);
        let products = self.store.find_products_by_ids(&requested, false)?;

        if products.len() != requested.len() {
            warn!(
                "event=products_validate module=service status=error requested={} found={}",
                requested.len(),
                products.len()
            );
            return Err(CatalogError::SomeNotFound);
        }

        Ok(products)
    }

    /// Non-failing variant of `validate_products` that names missing ids.
    pub fn check_products(&self, ids: &[ProductId]) -> CatalogResult<ValidationReport> {
        let requested = dedup_ids(ids);
        let products = self.store.find_products_by_ids(&requested, false)?;
        Ok(ValidationReport::new(&requested, products))
    }
}
