//! Primitive types shared by the canonical model.
//!
//! This module provides type-safe wrappers for IDs, money, providers and
//! statuses.

pub mod id;
pub mod price;
pub mod provider;
pub mod status;

pub use id::*;
pub use price::{CurrencyCode, from_minor_units, round_money, to_minor_units};
pub use provider::{Environment, PosProvider};
pub use status::*;
