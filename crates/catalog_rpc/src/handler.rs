//! Message-pattern dispatch over the catalog service.
//!
//! # Responsibility
//! - Map message patterns to catalog operations.
//! - Wrap results and failures in the line-oriented JSON envelope.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes an `RpcError`.
//! - Each request is logged with a correlation id, never with payload values.

use crate::dto::{
    CreateProductDto, PaginationDto, ProductIdDto, UpdateProductDto, ValidateProductsDto,
};
use crate::error::RpcError;
use catalog_core::service::error::STATUS_INTERNAL_ERROR;
use catalog_core::{ProductService, ProductStore};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Instant;
use uuid::Uuid;

const MAX_LOG_FIELD_CHARS: usize = 64;

/// Message patterns served by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePattern {
    CreateProduct,
    FindAllProducts,
    FindOneProduct,
    UpdateProduct,
    DeleteProduct,
    ValidateProducts,
}

impl MessagePattern {
    pub const ALL: [MessagePattern; 6] = [
        Self::CreateProduct,
        Self::FindAllProducts,
        Self::FindOneProduct,
        Self::UpdateProduct,
        Self::DeleteProduct,
        Self::ValidateProducts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateProduct => "create_product",
            Self::FindAllProducts => "find_all_products",
            Self::FindOneProduct => "find_one_product",
            Self::UpdateProduct => "update_product",
            Self::DeleteProduct => "delete_product",
            Self::ValidateProducts => "validate_products",
        }
    }
}

impl Display for MessagePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessagePattern {
    type Err = RpcError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pattern| pattern.as_str() == value)
            .ok_or_else(|| RpcError::bad_request(format!("unknown message pattern `{value}`")))
    }
}

/// One request line: `{"cmd": "...", "payload": {...}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcRequest {
    pub cmd: String,
    #[serde(default)]
    pub payload: Value,
    /// Caller correlation id; generated when absent.
    #[serde(default)]
    pub request_id: Option<String>,
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcResponse {
    pub ok: bool,
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// Catalog message handler over an injected store.
pub struct CatalogHandler<S: ProductStore> {
    service: ProductService<S>,
    default_limit: u32,
}

impl<S: ProductStore> CatalogHandler<S> {
    pub fn new(service: ProductService<S>, default_limit: u32) -> Self {
        Self {
            service,
            default_limit,
        }
    }

    /// Runs one message pattern against its JSON payload.
    pub fn dispatch(&self, pattern: MessagePattern, payload: Value) -> Result<Value, RpcError> {
        match pattern {
            MessagePattern::CreateProduct => {
                let request = parse_payload::<CreateProductDto>(payload)?.validate()?;
                let product = self.service.create(request.name, request.price)?;
                to_value(&product)
            }
            MessagePattern::FindAllProducts => {
                let (page, limit) =
                    parse_payload::<PaginationDto>(payload)?.resolve(self.default_limit)?;
                to_value(&self.service.find_all(page, limit)?)
            }
            MessagePattern::FindOneProduct => {
                let id = parse_payload::<ProductIdDto>(payload)?.validate()?;
                let product = self.service.find_one(id)?;
                Ok(json!({ "data": to_value(&product)? }))
            }
            MessagePattern::UpdateProduct => {
                let (id, patch) = parse_payload::<UpdateProductDto>(payload)?.validate()?;
                to_value(&self.service.update(id, patch)?)
            }
            MessagePattern::DeleteProduct => {
                let id = parse_payload::<ProductIdDto>(payload)?.validate()?;
                to_value(&self.service.remove(id)?)
            }
            MessagePattern::ValidateProducts => {
                let ids = parse_payload::<ValidateProductsDto>(payload)?.validate()?;
                to_value(&self.service.validate_products(&ids)?)
            }
        }
    }

    /// Handles one parsed request and builds its response envelope.
    pub fn handle(&self, request: RpcRequest) -> RpcResponse {
        let request_id = request
            .request_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let started_at = Instant::now();
        let log_request_id = log_field(&request_id);
        let log_cmd = log_field(&request.cmd);

        let result = request
            .cmd
            .parse::<MessagePattern>()
            .and_then(|pattern| self.dispatch(pattern, request.payload));

        match result {
            Ok(data) => {
                info!(
                    "event=rpc_request module=rpc status=ok request_id={} cmd={} duration_ms={}",
                    log_request_id,
                    log_cmd,
                    started_at.elapsed().as_millis()
                );
                RpcResponse {
                    ok: true,
                    request_id,
                    data: Some(data),
                    error: None,
                }
            }
            Err(err) => {
                warn!(
                    "event=rpc_request module=rpc status=error request_id={} cmd={} duration_ms={} error_status={}",
                    log_request_id,
                    log_cmd,
                    started_at.elapsed().as_millis(),
                    err.status
                );
                RpcResponse {
                    ok: false,
                    request_id,
                    data: None,
                    error: Some(err),
                }
            }
        }
    }

    /// Handles one raw JSON line and returns the serialized response line.
    pub fn handle_line(&self, line: &str) -> String {
        let response = match serde_json::from_str::<RpcRequest>(line) {
            Ok(request) => self.handle(request),
            Err(err) => RpcResponse {
                ok: false,
                request_id: Uuid::new_v4().to_string(),
                data: None,
                error: Some(RpcError::bad_request(format!("invalid request: {err}"))),
            },
        };

        serde_json::to_string(&response).unwrap_or_else(|err| {
            format!(
                r#"{{"ok":false,"requestId":"{}","error":{{"status":500,"message":"failed to encode response: {}"}}}}"#,
                response.request_id,
                err.to_string().replace('"', "'")
            )
        })
    }
}

/// A missing payload is read as `{}` so optional-only DTOs still parse.
fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T, RpcError> {
    let payload = if payload.is_null() {
        Value::Object(Map::new())
    } else {
        payload
    };
    Ok(serde_json::from_value(payload)?)
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|err| RpcError {
        status: STATUS_INTERNAL_ERROR,
        message: format!("failed to encode response: {err}"),
    })
}

/// Renders a caller-supplied value as one `key=value` token.
fn log_field(value: &str) -> String {
    let mut field = value
        .chars()
        .take(MAX_LOG_FIELD_CHARS)
        .map(|ch| if ch.is_ascii_graphic() { ch } else { '_' })
        .collect::<String>();
    if value.chars().count() > MAX_LOG_FIELD_CHARS {
        field.push_str("...");
    }
    field
}

#[cfg(test)]
mod tests {
    use super::{log_field, MAX_LOG_FIELD_CHARS};

    #[test]
    fn log_field_keeps_plain_tokens() {
        assert_eq!(log_field("req-1"), "req-1");
        assert_eq!(log_field("create_product"), "create_product");
    }

    #[test]
    fn log_field_cannot_break_the_log_line() {
        let field = log_field("x\nevent=rpc_request status=ok\r");
        assert!(!field.contains('\n'));
        assert!(!field.contains('\r'));
        assert!(!field.contains(' '));
        assert_eq!(field, "x_event=rpc_request_status=ok_");
    }

    #[test]
    fn log_field_truncates_long_values() {
        let field = log_field(&"a".repeat(MAX_LOG_FIELD_CHARS + 10));
        assert_eq!(field.len(), MAX_LOG_FIELD_CHARS + 3);
        assert!(field.ends_with("..."));
    }
}
