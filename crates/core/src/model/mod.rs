//! Canonical, vendor-neutral domain records.
//!
//! Every adapter produces and consumes these types. Nothing here is
//! persisted by the integration layer; records are fetched live from the
//! vendor (or generated by the mock store) on every read.

pub mod catalog;
pub mod connection;
pub mod inventory;
pub mod labor;
pub mod order;
pub mod payment;
pub mod query;
pub mod reporting;

pub use catalog::{MenuItem, MenuItemUpdate, Modifier, ModifierOption, NewMenuItem};
pub use connection::{
    ConnectionStatus, ConnectionTest, RateLimitInfo, SyncFailure, SyncResult, WebhookRegistration,
};
pub use inventory::InventoryItem;
pub use labor::{Employee, Shift};
pub use order::{
    CustomerInfo, NewOrder, NewOrderItem, NewOrderModifier, Order, OrderItem, OrderModifier,
    TotalsDiscrepancy, TotalsField,
};
pub use payment::{PaymentRequest, PaymentResult, Transaction};
pub use query::{DEFAULT_LIMIT, OrderQuery, ShiftQuery, TransactionQuery, within_range};
pub use reporting::{HourlySales, PaymentMethodBreakdown, SalesData, TopSellingItem};
