//! Message-pattern transport adapter for the product catalog.
//!
//! # Responsibility
//! - Validate request payloads before they reach `catalog_core`.
//! - Translate catalog results and errors into JSON envelopes.
//!
//! # Invariants
//! - Transport code holds no catalog state; the store handle is injected.

pub mod dto;
pub mod error;
pub mod handler;

pub use error::RpcError;
pub use handler::{CatalogHandler, MessagePattern, RpcRequest, RpcResponse};
