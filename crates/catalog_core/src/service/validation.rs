//! Bulk validator.
//!
//! # Invariants
//! - Requested ids are deduplicated before comparison.
//! - Strict validation is all-or-nothing: no partial list on failure.

use crate::model::product::{Product, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Non-failing bulk lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Available products that matched, ordered by id.
    pub found: Vec<Product>,
    /// Requested ids with no available product, ordered ascending.
    pub missing: Vec<ProductId>,
}

impl ValidationReport {
    /// Builds a report from the deduplicated request and the fetched records.
    pub fn new(requested: &[ProductId], found: Vec<Product>) -> Self {
        let found_ids = found.iter().map(|product| product.id).collect::<BTreeSet<_>>();
        let missing = requested
            .iter()
            .copied()
            .filter(|id| !found_ids.contains(id))
            .collect();
        Self { found, missing }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Deduplicates ids with set semantics. Output is ascending.
pub fn dedup_ids(ids: &[ProductId]) -> Vec<ProductId> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}
