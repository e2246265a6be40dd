//! POS Bridge Core - Canonical point-of-sale domain model.
//!
//! This crate provides the vendor-neutral types shared by every POS adapter:
//! - [`model`] - Menu, inventory, labor, order, payment and reporting records
//! - [`envelope`] - The uniform `ApiResponse` result envelope and error record
//! - [`types`] - Type-safe IDs, money helpers, providers and status maps
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Vendor
//! translation lives in `pos-bridge-adapters`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod envelope;
pub mod model;
pub mod types;

pub use envelope::{ApiError, ApiResponse, Pagination, ResponseMetadata};
pub use model::*;
pub use types::*;
