//! POS Bridge Adapters - Vendor integrations behind one canonical contract.
//!
//! This crate turns the vendor-neutral types in `pos-bridge-core` into live
//! integrations:
//! - [`adapter`] - The [`PosAdapter`] contract and the closed [`Adapter`] enum
//! - [`square`] / [`toast`] - REST adapters for the two supported vendors
//! - [`mock`] - Seeded in-memory adapter for demos and tests
//! - [`factory`] / [`builder`] - Validated construction from a [`PosConfig`]
//!
//! # Example
//!
//! ```no_run
//! use pos_bridge_adapters::{AdapterFactory, MockOptions, PosAdapter};
//! use pos_bridge_core::{Environment, PosProvider};
//!
//! # async fn run() -> Result<(), pos_bridge_adapters::ConfigError> {
//! let factory = AdapterFactory::new().with_mock_options(MockOptions::instant());
//! let adapter = factory
//!     .builder()
//!     .provider(PosProvider::Mock)
//!     .environment(Environment::Sandbox)
//!     .create_adapter()?;
//! let items = adapter.get_menu_items().await;
//! assert!(items.success);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod adapter;
pub mod builder;
pub mod config;
pub mod connection;
pub mod error;
pub mod factory;
pub mod http;
pub mod mock;
pub mod reporting;
pub mod square;
pub mod toast;

pub use adapter::{Adapter, PosAdapter};
pub use builder::{ConnectionOptions, PosConfigBuilder};
pub use config::{
    ConfigError, ConfigViolation, EnvError, NormalizedConfig, PosConfig, default_base_url,
};
pub use error::PosError;
pub use factory::AdapterFactory;
pub use http::{HttpError, RetryPolicy};
pub use mock::{MockAdapter, MockOptions};
pub use square::SquareAdapter;
pub use toast::ToastAdapter;
