//! Request DTOs and field validation.
//!
//! # Responsibility
//! - Parse message payloads into typed requests.
//! - Enforce field rules before requests reach the catalog core.
//!
//! # Invariants
//! - Prices are parsed from the JSON number text, never through `f64`.
//! - Update payload identifiers select the target and are never merged.

use crate::error::RpcError;
use catalog_core::model::product::{validate_name, validate_price};
use catalog_core::{ProductId, ProductPatch};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Number;
use std::str::FromStr;

/// Payload for `create_product`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductDto {
    pub name: String,
    pub price: Number,
}

/// Payload for `update_product`. Every field except `id` is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductDto {
    pub id: ProductId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Number>,
}

/// Payload for `find_one_product` and `delete_product`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProductIdDto {
    pub id: ProductId,
}

/// Payload for `find_all_products`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationDto {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Payload for `validate_products`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateProductsDto {
    pub ids: Vec<ProductId>,
}

/// Validated create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
}

pub const DEFAULT_PAGE: u32 = 1;

impl CreateProductDto {
    pub fn validate(self) -> Result<NewProduct, RpcError> {
        check_name(&self.name)?;
        let price = parse_price(&self.price)?;
        Ok(NewProduct {
            name: self.name,
            price,
        })
    }
}

impl UpdateProductDto {
    /// Splits the payload into the target id and a patch without any id.
    pub fn validate(self) -> Result<(ProductId, ProductPatch), RpcError> {
        let id = check_id(self.id)?;
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        let price = self.price.as_ref().map(parse_price).transpose()?;
        Ok((
            id,
            ProductPatch {
                name: self.name,
                price,
            },
        ))
    }
}

impl ProductIdDto {
    pub fn validate(self) -> Result<ProductId, RpcError> {
        check_id(self.id)
    }
}

impl PaginationDto {
    /// Applies defaults and returns `(page, limit)`.
    pub fn resolve(self, default_limit: u32) -> Result<(u32, u32), RpcError> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let limit = self.limit.unwrap_or(default_limit);
        if page == 0 {
            return Err(RpcError::bad_request("page must be a positive number"));
        }
        if limit == 0 {
            return Err(RpcError::bad_request("limit must be a positive number"));
        }
        Ok((page, limit))
    }
}

impl ValidateProductsDto {
    pub fn validate(self) -> Result<Vec<ProductId>, RpcError> {
        if self.ids.is_empty() {
            return Err(RpcError::bad_request("ids must contain at least 1 element"));
        }
        self.ids.into_iter().map(check_id).collect()
    }
}

fn check_id(id: ProductId) -> Result<ProductId, RpcError> {
    if id < 1 {
        return Err(RpcError::bad_request(format!(
            "id must be a positive number, got {id}"
        )));
    }
    Ok(id)
}

fn check_name(name: &str) -> Result<(), RpcError> {
    validate_name(name).map_err(|err| RpcError::bad_request(format!("name: {err}")))
}

/// Converts a JSON number to a decimal price and checks price rules.
pub fn parse_price(number: &Number) -> Result<Decimal, RpcError> {
    let price = if let Some(value) = number.as_i64() {
        Decimal::from(value)
    } else if let Some(value) = number.as_u64() {
        Decimal::from(value)
    } else {
        let text = number.to_string();
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| RpcError::bad_request(format!("price `{text}` is not a valid number")))?
    };

    validate_price(price).map_err(|err| RpcError::bad_request(format!("price: {err}")))?;
    Ok(price)
}
