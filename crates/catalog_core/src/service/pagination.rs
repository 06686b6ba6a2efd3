//! Pagination calculator.
//!
//! Turns a `(page, limit)` request into a bounded window over the visible
//! product set and computes result metadata. Pages past the end are not
//! errors: they yield an empty window with valid metadata.

use crate::model::product::Product;
use crate::service::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};

/// Validated one-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    limit: u32,
}

/// Result metadata for a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub total_pages: u64,
    pub total_count: u64,
}

/// Paginated listing envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub data: Vec<Product>,
    pub meta: PageMeta,
}

impl PageWindow {
    /// # Errors
    /// Returns `InvalidPagination` when `page` or `limit` is zero.
    pub fn new(page: u32, limit: u32) -> CatalogResult<Self> {
        if page == 0 || limit == 0 {
            return Err(CatalogError::InvalidPagination { page, limit });
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// `ceil(total_count / limit)`; zero for an empty set.
    pub fn total_pages(&self, total_count: u64) -> u64 {
        total_count.div_ceil(u64::from(self.limit))
    }

    /// Builds metadata for this window given the visible record count.
    pub fn meta(&self, total_count: u64) -> PageMeta {
        PageMeta {
            page: self.page,
            total_pages: self.total_pages(total_count),
            total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PageWindow;
    use crate::service::error::CatalogError;

    #[test]
    fn rejects_zero_page_or_limit() {
        assert!(matches!(
            PageWindow::new(0, 10),
            Err(CatalogError::InvalidPagination { page: 0, limit: 10 })
        ));
        assert!(PageWindow::new(1, 0).is_err());
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PageWindow::new(1, 10).unwrap().offset(), 0);
        assert_eq!(PageWindow::new(3, 10).unwrap().offset(), 20);
        assert_eq!(
            PageWindow::new(u32::MAX, u32::MAX).unwrap().offset(),
            u64::from(u32::MAX - 1) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn total_pages_rounds_up() {
        let window = PageWindow::new(1, 10).unwrap();
        assert_eq!(window.total_pages(0), 0);
        assert_eq!(window.total_pages(1), 1);
        assert_eq!(window.total_pages(10), 1);
        assert_eq!(window.total_pages(25), 3);
    }

    #[test]
    fn meta_serializes_camel_case() {
        let meta = PageWindow::new(2, 5).unwrap().meta(11);
        let value = serde_json::to_value(meta).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "page": 2, "totalPages": 3, "totalCount": 11 })
        );
    }
}
