//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record shared by store, services and transport.
//! - Own the single visibility predicate used by every read path.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused or rewritten.
//! - `available` only moves from `true` to `false`; there is no restore.
//! - `price` is non-negative with at most `MAX_PRICE_SCALE` fractional digits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned product identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ProductId = i64;

/// Maximum number of fractional digits accepted for `price`.
pub const MAX_PRICE_SCALE: u32 = 4;

/// Validation failure for product field invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductValidationError {
    #[error("name must not be blank")]
    BlankName,
    #[error("price must not be negative, got {0}")]
    NegativePrice(Decimal),
    #[error("price must have at most {max} decimal places, got {actual}")]
    PriceScale { actual: u32, max: u32 },
}

/// Canonical catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier. Zero until persisted.
    pub id: ProductId,
    pub name: String,
    /// Stored exactly; crosses the wire as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Availability flag; `false` means soft-deleted.
    pub available: bool,
}

/// Field-level partial update for an existing product.
///
/// Carries no identifier: the target id is passed separately and can never
/// be overwritten through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

impl Product {
    /// Creates an unsaved, available product. The store assigns `id`.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: 0,
            name: name.into(),
            price,
            available: true,
        }
    }

    /// Validates field invariants before persistence.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        validate_name(&self.name)?;
        validate_price(self.price)
    }

    /// Returns whether this product is visible to read paths.
    pub fn is_visible(&self) -> bool {
        self.available
    }

    /// Marks this product as unavailable (soft delete). One-way.
    pub fn soft_delete(&mut self) {
        self.available = false;
    }

    /// Merges patch fields into this record. `id` and `available` are untouched.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
    }
}

impl ProductPatch {
    /// Returns `true` when the patch carries no field changes.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }
}

/// Checks the name invariant (non-blank after trim).
pub fn validate_name(name: &str) -> Result<(), ProductValidationError> {
    if name.trim().is_empty() {
        return Err(ProductValidationError::BlankName);
    }
    Ok(())
}

/// Checks the price invariants (non-negative, bounded scale).
///
/// Trailing zeros do not count towards the scale: `1.50000` is accepted.
pub fn validate_price(price: Decimal) -> Result<(), ProductValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ProductValidationError::NegativePrice(price));
    }
    let scale = price.normalize().scale();
    if scale > MAX_PRICE_SCALE {
        return Err(ProductValidationError::PriceScale {
            actual: scale,
            max: MAX_PRICE_SCALE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_price, Product, ProductPatch, ProductValidationError};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn new_product_is_available_and_unsaved() {
        let product = Product::new("lamp", dec("10"));
        assert_eq!(product.id, 0);
        assert!(product.is_visible());
    }

    #[test]
    fn soft_delete_hides_product() {
        let mut product = Product::new("lamp", dec("10"));
        product.soft_delete();
        assert!(!product.is_visible());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let product = Product::new("   ", dec("1"));
        assert_eq!(product.validate(), Err(ProductValidationError::BlankName));
    }

    #[test]
    fn validate_price_bounds_scale_and_sign() {
        assert!(validate_price(dec("0")).is_ok());
        assert!(validate_price(dec("12.3456")).is_ok());
        assert!(validate_price(dec("1.50000")).is_ok());
        assert!(matches!(
            validate_price(dec("1.23456")),
            Err(ProductValidationError::PriceScale { actual: 5, max: 4 })
        ));
        assert!(matches!(
            validate_price(dec("-0.01")),
            Err(ProductValidationError::NegativePrice(_))
        ));
    }

    #[test]
    fn price_serializes_as_json_number() {
        let mut product = Product::new("lamp", dec("10.5"));
        product.id = 3;
        let value = serde_json::to_value(&product).unwrap();
        assert!(value["price"].is_number());
        assert_eq!(value["price"].as_f64(), Some(10.5));
    }

    #[test]
    fn apply_merges_only_supplied_fields() {
        let mut product = Product::new("lamp", dec("10"));
        product.id = 7;
        product.apply(ProductPatch {
            name: Some("desk lamp".to_string()),
            price: None,
        });
        assert_eq!(product.id, 7);
        assert_eq!(product.name, "desk lamp");
        assert_eq!(product.price, dec("10"));
        assert!(product.available);
    }
}
