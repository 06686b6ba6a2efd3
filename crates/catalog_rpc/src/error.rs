//! Structured failure carried back to RPC callers.

use catalog_core::service::error::STATUS_BAD_REQUEST;
use catalog_core::CatalogError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transport-facing error: a status code plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{status}: {message}")]
pub struct RpcError {
    pub status: u16,
    pub message: String,
}

impl RpcError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<CatalogError> for RpcError {
    fn from(value: CatalogError) -> Self {
        Self {
            status: value.status_code(),
            message: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(value: serde_json::Error) -> Self {
        Self::bad_request(format!("invalid payload: {value}"))
    }
}
