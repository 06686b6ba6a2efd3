//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record store calls into catalog operations.
//! - Keep transport layers decoupled from storage details.

pub mod error;
pub mod pagination;
pub mod product_service;
pub mod validation;
