//! Catalog domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every product is identified by a store-assigned `ProductId`.
//! - Deletion is represented by the `available` flag, not hard delete.

pub mod product;
