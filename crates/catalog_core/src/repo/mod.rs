//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store capability consumed by catalog services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Product::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod product_repo;
