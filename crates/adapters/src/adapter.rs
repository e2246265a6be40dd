//! The canonical POS contract.
//!
//! [`PosAdapter`] is the one interface every vendor integration implements.
//! Each operation returns an [`ApiResponse`]: operational failures (network,
//! vendor, validation, unsupported capability) are reported in the envelope
//! with a provider-prefixed code, never as a panic.
//!
//! [`Adapter`] is the closed set of implementations produced by the factory.

use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use pos_bridge_core::{
    ApiResponse, ConnectionStatus, ConnectionTest, Employee, EmployeeId, InventoryItem,
    InventoryItemId, MenuItem, MenuItemId, MenuItemUpdate, NewMenuItem, NewOrder, Order,
    OrderId, OrderQuery, OrderStatus, PaymentRequest, PaymentResult, PosProvider, ReportPeriod,
    SalesData, Shift, ShiftId, ShiftQuery, SyncFailure, SyncResult, Transaction, TransactionId,
    TransactionQuery, WebhookId, WebhookRegistration,
};
use rust_decimal::Decimal;

use crate::error::{PosError, not_supported, respond};
use crate::mock::MockAdapter;
use crate::square::SquareAdapter;
use crate::toast::ToastAdapter;

/// How far back `sync_data` looks for orders and transactions.
const SYNC_WINDOW_DAYS: i64 = 30;

/// Upper bound on orders and transactions counted by `sync_data`.
const SYNC_LIMIT: usize = 1000;

/// Operations every POS integration exposes.
///
/// Implementations are shareable across tasks; every method takes `&self`.
#[allow(async_fn_in_trait)]
pub trait PosAdapter {
    /// Which vendor this adapter talks to.
    fn provider(&self) -> PosProvider;

    // =========================================================================
    // Connection
    // =========================================================================

    /// Authenticate and verify the vendor is reachable. Idempotent.
    async fn connect(&self) -> ApiResponse<ConnectionStatus>;

    /// Drop the connection. Idempotent.
    async fn disconnect(&self) -> ApiResponse<ConnectionStatus>;

    /// Current connection status, including the latest rate-limit headers.
    async fn get_connection_status(&self) -> ApiResponse<ConnectionStatus>;

    /// Lightweight round trip reporting latency.
    async fn test_connection(&self) -> ApiResponse<ConnectionTest>;

    // =========================================================================
    // Sales
    // =========================================================================

    /// Aggregate sales between `start` and `end`.
    async fn get_sales_data(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: ReportPeriod,
    ) -> ApiResponse<SalesData>;

    /// Payments and refunds, newest first.
    async fn get_transactions(&self, query: &TransactionQuery) -> ApiResponse<Vec<Transaction>>;

    // =========================================================================
    // Menu
    // =========================================================================

    async fn get_menu_items(&self) -> ApiResponse<Vec<MenuItem>>;

    async fn get_menu_item(&self, id: &MenuItemId) -> ApiResponse<MenuItem>;

    async fn create_menu_item(&self, item: &NewMenuItem) -> ApiResponse<MenuItem>;

    async fn update_menu_item(
        &self,
        id: &MenuItemId,
        update: &MenuItemUpdate,
    ) -> ApiResponse<MenuItem>;

    async fn delete_menu_item(&self, id: &MenuItemId) -> ApiResponse<()>;

    /// Toggle whether the item can be sold.
    async fn update_menu_item_availability(
        &self,
        id: &MenuItemId,
        is_available: bool,
    ) -> ApiResponse<MenuItem>;

    // =========================================================================
    // Inventory
    // =========================================================================

    async fn get_inventory_items(&self) -> ApiResponse<Vec<InventoryItem>>;

    async fn get_inventory_item(&self, id: &InventoryItemId) -> ApiResponse<InventoryItem>;

    /// Set the absolute stock level.
    async fn update_inventory_level(
        &self,
        id: &InventoryItemId,
        quantity: Decimal,
    ) -> ApiResponse<InventoryItem>;

    /// Items at or below their alert level.
    async fn get_inventory_alerts(&self) -> ApiResponse<Vec<InventoryItem>> {
        self.get_inventory_items().await.map(|items| {
            items
                .into_iter()
                .filter(InventoryItem::is_in_alert)
                .collect()
        })
    }

    // =========================================================================
    // Labor
    // =========================================================================

    async fn get_employees(&self) -> ApiResponse<Vec<Employee>>;

    async fn get_employee(&self, id: &EmployeeId) -> ApiResponse<Employee>;

    async fn get_employee_shifts(&self, query: &ShiftQuery) -> ApiResponse<Vec<Shift>>;

    /// Clock the employee in.
    async fn start_shift(&self, employee_id: &EmployeeId) -> ApiResponse<Shift>;

    /// Clock out, computing hours and pay.
    async fn end_shift(&self, shift_id: &ShiftId) -> ApiResponse<Shift>;

    // =========================================================================
    // Orders
    // =========================================================================

    /// Orders, newest first.
    async fn get_orders(&self, query: &OrderQuery) -> ApiResponse<Vec<Order>>;

    async fn get_order(&self, id: &OrderId) -> ApiResponse<Order>;

    async fn create_order(&self, order: &NewOrder) -> ApiResponse<Order>;

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> ApiResponse<Order>;

    async fn cancel_order(&self, id: &OrderId, reason: Option<&str>) -> ApiResponse<Order>;

    // =========================================================================
    // Payments
    // =========================================================================

    /// Charge an order. A decline is a successful call with
    /// `PaymentResult::success == false`.
    async fn process_payment(&self, request: &PaymentRequest) -> ApiResponse<PaymentResult>;

    /// Refund all of a transaction, or `amount` of it.
    async fn refund_transaction(
        &self,
        id: &TransactionId,
        amount: Option<Decimal>,
        reason: Option<&str>,
    ) -> ApiResponse<Transaction>;

    // =========================================================================
    // Sync and webhooks
    // =========================================================================

    /// Fetch every entity category and report counts.
    ///
    /// Succeeds when at least one category could be fetched; categories that
    /// failed are listed in [`SyncResult::failures`].
    async fn sync_data(&self) -> ApiResponse<SyncResult> {
        let started = Instant::now();
        let window_start = Utc::now() - Duration::days(SYNC_WINDOW_DAYS);
        let order_query = OrderQuery {
            start: Some(window_start),
            limit: SYNC_LIMIT,
            ..OrderQuery::default()
        };
        let transaction_query = TransactionQuery {
            start: Some(window_start),
            limit: SYNC_LIMIT,
            ..TransactionQuery::default()
        };

        let (menu_items, inventory_items, employees, orders, transactions) = tokio::join!(
            self.get_menu_items(),
            self.get_inventory_items(),
            self.get_employees(),
            self.get_orders(&order_query),
            self.get_transactions(&transaction_query),
        );

        let mut failures = Vec::new();
        let result = SyncResult {
            menu_items: tally("menuItems", menu_items, &mut failures),
            inventory_items: tally("inventoryItems", inventory_items, &mut failures),
            employees: tally("employees", employees, &mut failures),
            orders: tally("orders", orders, &mut failures),
            transactions: tally("transactions", transactions, &mut failures),
            synced_at: Utc::now(),
            failures,
        };

        let outcome = if result.failures.len() == SYNC_CATEGORIES {
            Err(PosError::Rejected {
                code: "SYNC_FAILED",
                message: format!(
                    "every category failed to sync: {}",
                    result
                        .failures
                        .iter()
                        .map(|f| f.code.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
        } else {
            Ok(result)
        };
        respond(self.provider(), "SYNC_DATA", started, outcome)
    }

    /// Subscribe `url` to vendor event notifications.
    async fn register_webhook(
        &self,
        _url: &str,
        _events: &[String],
    ) -> ApiResponse<WebhookRegistration> {
        not_supported(self.provider(), "REGISTER_WEBHOOK")
    }

    /// Remove a webhook subscription.
    async fn unregister_webhook(&self, _id: &WebhookId) -> ApiResponse<()> {
        not_supported(self.provider(), "UNREGISTER_WEBHOOK")
    }
}

const SYNC_CATEGORIES: usize = 5;

fn tally<T>(
    category: &str,
    response: ApiResponse<Vec<T>>,
    failures: &mut Vec<SyncFailure>,
) -> usize {
    match response.into_result() {
        Ok(items) => items.len(),
        Err(error) => {
            failures.push(SyncFailure {
                category: category.to_string(),
                code: error.code,
                message: error.message,
            });
            0
        }
    }
}

// =============================================================================
// Adapter
// =============================================================================

/// A configured adapter for one of the supported vendors.
#[derive(Debug)]
pub enum Adapter {
    Square(SquareAdapter),
    Toast(ToastAdapter),
    Mock(MockAdapter),
}

macro_rules! dispatch {
    ($self:ident, $adapter:ident => $call:expr) => {
        match $self {
            Self::Square($adapter) => $call,
            Self::Toast($adapter) => $call,
            Self::Mock($adapter) => $call,
        }
    };
}

impl Adapter {
    /// The mock adapter, when this is one.
    #[must_use]
    pub const fn as_mock(&self) -> Option<&MockAdapter> {
        match self {
            Self::Mock(mock) => Some(mock),
            _ => None,
        }
    }
}

impl PosAdapter for Adapter {
    fn provider(&self) -> PosProvider {
        dispatch!(self, a => a.provider())
    }

    async fn connect(&self) -> ApiResponse<ConnectionStatus> {
        dispatch!(self, a => a.connect().await)
    }

    async fn disconnect(&self) -> ApiResponse<ConnectionStatus> {
        dispatch!(self, a => a.disconnect().await)
    }

    async fn get_connection_status(&self) -> ApiResponse<ConnectionStatus> {
        dispatch!(self, a => a.get_connection_status().await)
    }

    async fn test_connection(&self) -> ApiResponse<ConnectionTest> {
        dispatch!(self, a => a.test_connection().await)
    }

    async fn get_sales_data(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: ReportPeriod,
    ) -> ApiResponse<SalesData> {
        dispatch!(self, a => a.get_sales_data(start, end, period).await)
    }

    async fn get_transactions(&self, query: &TransactionQuery) -> ApiResponse<Vec<Transaction>> {
        dispatch!(self, a => a.get_transactions(query).await)
    }

    async fn get_menu_items(&self) -> ApiResponse<Vec<MenuItem>> {
        dispatch!(self, a => a.get_menu_items().await)
    }

    async fn get_menu_item(&self, id: &MenuItemId) -> ApiResponse<MenuItem> {
        dispatch!(self, a => a.get_menu_item(id).await)
    }

    async fn create_menu_item(&self, item: &NewMenuItem) -> ApiResponse<MenuItem> {
        dispatch!(self, a => a.create_menu_item(item).await)
    }

    async fn update_menu_item(
        &self,
        id: &MenuItemId,
        update: &MenuItemUpdate,
    ) -> ApiResponse<MenuItem> {
        dispatch!(self, a => a.update_menu_item(id, update).await)
    }

    async fn delete_menu_item(&self, id: &MenuItemId) -> ApiResponse<()> {
        dispatch!(self, a => a.delete_menu_item(id).await)
    }

    async fn update_menu_item_availability(
        &self,
        id: &MenuItemId,
        is_available: bool,
    ) -> ApiResponse<MenuItem> {
        dispatch!(self, a => a.update_menu_item_availability(id, is_available).await)
    }

    async fn get_inventory_items(&self) -> ApiResponse<Vec<InventoryItem>> {
        dispatch!(self, a => a.get_inventory_items().await)
    }

    async fn get_inventory_item(&self, id: &InventoryItemId) -> ApiResponse<InventoryItem> {
        dispatch!(self, a => a.get_inventory_item(id).await)
    }

    async fn update_inventory_level(
        &self,
        id: &InventoryItemId,
        quantity: Decimal,
    ) -> ApiResponse<InventoryItem> {
        dispatch!(self, a => a.update_inventory_level(id, quantity).await)
    }

    async fn get_inventory_alerts(&self) -> ApiResponse<Vec<InventoryItem>> {
        dispatch!(self, a => a.get_inventory_alerts().await)
    }

    async fn get_employees(&self) -> ApiResponse<Vec<Employee>> {
        dispatch!(self, a => a.get_employees().await)
    }

    async fn get_employee(&self, id: &EmployeeId) -> ApiResponse<Employee> {
        dispatch!(self, a => a.get_employee(id).await)
    }

    async fn get_employee_shifts(&self, query: &ShiftQuery) -> ApiResponse<Vec<Shift>> {
        dispatch!(self, a => a.get_employee_shifts(query).await)
    }

    async fn start_shift(&self, employee_id: &EmployeeId) -> ApiResponse<Shift> {
        dispatch!(self, a => a.start_shift(employee_id).await)
    }

    async fn end_shift(&self, shift_id: &ShiftId) -> ApiResponse<Shift> {
        dispatch!(self, a => a.end_shift(shift_id).await)
    }

    async fn get_orders(&self, query: &OrderQuery) -> ApiResponse<Vec<Order>> {
        dispatch!(self, a => a.get_orders(query).await)
    }

    async fn get_order(&self, id: &OrderId) -> ApiResponse<Order> {
        dispatch!(self, a => a.get_order(id).await)
    }

    async fn create_order(&self, order: &NewOrder) -> ApiResponse<Order> {
        dispatch!(self, a => a.create_order(order).await)
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> ApiResponse<Order> {
        dispatch!(self, a => a.update_order_status(id, status).await)
    }

    async fn cancel_order(&self, id: &OrderId, reason: Option<&str>) -> ApiResponse<Order> {
        dispatch!(self, a => a.cancel_order(id, reason).await)
    }

    async fn process_payment(&self, request: &PaymentRequest) -> ApiResponse<PaymentResult> {
        dispatch!(self, a => a.process_payment(request).await)
    }

    async fn refund_transaction(
        &self,
        id: &TransactionId,
        amount: Option<Decimal>,
        reason: Option<&str>,
    ) -> ApiResponse<Transaction> {
        dispatch!(self, a => a.refund_transaction(id, amount, reason).await)
    }

    async fn sync_data(&self) -> ApiResponse<SyncResult> {
        dispatch!(self, a => a.sync_data().await)
    }

    async fn register_webhook(
        &self,
        url: &str,
        events: &[String],
    ) -> ApiResponse<WebhookRegistration> {
        dispatch!(self, a => a.register_webhook(url, events).await)
    }

    async fn unregister_webhook(&self, id: &WebhookId) -> ApiResponse<()> {
        dispatch!(self, a => a.unregister_webhook(id).await)
    }
}
