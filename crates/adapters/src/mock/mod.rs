//! Synthetic POS adapter backed by an in-memory store.
//!
//! Every operation sleeps for the configured latency plus random jitter.
//! `test_connection` and `process_payment` fail with probability
//! `failure_rate`, so callers can exercise their failure paths without a
//! network. All randomness is seeded.

mod store;

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use pos_bridge_core::{
    ApiResponse, ConnectionStatus, ConnectionTest, Employee, EmployeeId, InventoryItem,
    InventoryItemId, MenuItem, MenuItemId, MenuItemUpdate, NewMenuItem, NewOrder, Order,
    OrderId, OrderQuery, OrderStatus, PaymentRequest, PaymentResult, PosProvider, ReportPeriod,
    SalesData, Shift, ShiftId, ShiftQuery, Transaction, TransactionId, TransactionQuery,
    WebhookId, WebhookRegistration,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

pub use store::{
    MockStore, ORDER_COUNT, ORDER_STATUS_WEIGHTS, ORDER_TYPE_WEIGHTS, ORDER_WINDOW_DAYS,
    PAYMENT_METHOD_WEIGHTS, REFUND_RATE, TAX_RATE,
};

use crate::adapter::PosAdapter;
use crate::connection::ConnectionState;
use crate::error::{PosError, respond};

const PROVIDER: PosProvider = PosProvider::Mock;

/// Simulation knobs for [`MockAdapter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockOptions {
    /// Fixed delay added to every operation.
    pub latency: Duration,
    /// Upper bound of the random delay added on top of `latency`.
    pub jitter: Duration,
    /// Probability in `[0, 1]` that a fallible operation fails.
    pub failure_rate: f64,
    /// Seed for generated data and failure injection.
    pub seed: u64,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(100),
            jitter: Duration::from_millis(200),
            failure_rate: 0.05,
            seed: 42,
        }
    }
}

impl MockOptions {
    /// No latency and no injected failures.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
            jitter: Duration::ZERO,
            failure_rate: 0.0,
            seed: 42,
        }
    }

    #[must_use]
    pub const fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_latency(mut self, latency: Duration, jitter: Duration) -> Self {
        self.latency = latency;
        self.jitter = jitter;
        self
    }
}

/// In-memory [`PosAdapter`].
#[derive(Debug)]
pub struct MockAdapter {
    options: MockOptions,
    connection: ConnectionState,
    store: RwLock<MockStore>,
    rng: Mutex<StdRng>,
}

impl MockAdapter {
    /// Create an adapter whose synthetic history ends at `anchor`.
    #[must_use]
    pub fn new(options: MockOptions, anchor: DateTime<Utc>) -> Self {
        debug!(seed = options.seed, %anchor, "Generating mock POS data");
        Self {
            options,
            connection: ConnectionState::default(),
            store: RwLock::new(MockStore::generate(options.seed, anchor)),
            rng: Mutex::new(StdRng::seed_from_u64(options.seed.wrapping_add(1))),
        }
    }

    #[must_use]
    pub const fn options(&self) -> MockOptions {
        self.options
    }

    /// End of the generated order window.
    pub async fn anchor(&self) -> DateTime<Utc> {
        self.store.read().await.anchor()
    }

    fn random_unit(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random::<f64>()
    }

    /// Simulate network latency and return the operation start time.
    async fn begin(&self) -> Instant {
        let started = Instant::now();
        let delay = self.options.latency + self.options.jitter.mul_f64(self.random_unit());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        started
    }

    fn should_fail(&self) -> bool {
        self.random_unit() < self.options.failure_rate
    }
}

impl PosAdapter for MockAdapter {
    fn provider(&self) -> PosProvider {
        PROVIDER
    }

    #[instrument(skip(self))]
    async fn connect(&self) -> ApiResponse<ConnectionStatus> {
        let started = self.begin().await;
        let result = self
            .connection
            .connect_with(|| async { Ok::<(), PosError>(()) })
            .await;
        respond(PROVIDER, "CONNECT", started, result)
    }

    #[instrument(skip(self))]
    async fn disconnect(&self) -> ApiResponse<ConnectionStatus> {
        let started = self.begin().await;
        let status = self.connection.disconnect().await;
        respond(PROVIDER, "DISCONNECT", started, Ok(status))
    }

    async fn get_connection_status(&self) -> ApiResponse<ConnectionStatus> {
        respond(
            PROVIDER,
            "GET_CONNECTION_STATUS",
            Instant::now(),
            Ok(self.connection.snapshot().await),
        )
    }

    #[instrument(skip(self))]
    async fn test_connection(&self) -> ApiResponse<ConnectionTest> {
        let started = self.begin().await;
        let result = if self.should_fail() {
            Err(PosError::Rejected {
                code: "CONNECTION_FAILED",
                message: "Simulated connection failure".to_string(),
            })
        } else {
            let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            Ok(ConnectionTest { latency_ms })
        };
        respond(PROVIDER, "TEST_CONNECTION", started, result)
    }

    #[instrument(skip(self))]
    async fn get_sales_data(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: ReportPeriod,
    ) -> ApiResponse<SalesData> {
        let started = self.begin().await;
        let result = if start > end {
            Err(PosError::InvalidRequest(format!(
                "start {start} is after end {end}"
            )))
        } else {
            Ok(self.store.read().await.sales(start, end, period))
        };
        respond(PROVIDER, "GET_SALES_DATA", started, result)
    }

    #[instrument(skip(self))]
    async fn get_transactions(&self, query: &TransactionQuery) -> ApiResponse<Vec<Transaction>> {
        let started = self.begin().await;
        let transactions = self.store.read().await.transactions(query);
        respond(PROVIDER, "GET_TRANSACTIONS", started, Ok(transactions))
    }

    async fn get_menu_items(&self) -> ApiResponse<Vec<MenuItem>> {
        let started = self.begin().await;
        let items = self.store.read().await.menu_items();
        respond(PROVIDER, "GET_MENU_ITEMS", started, Ok(items))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_menu_item(&self, id: &MenuItemId) -> ApiResponse<MenuItem> {
        let started = self.begin().await;
        let result = self.store.read().await.menu_item(id);
        respond(PROVIDER, "GET_MENU_ITEM", started, result)
    }

    #[instrument(skip(self, item), fields(name = %item.name))]
    async fn create_menu_item(&self, item: &NewMenuItem) -> ApiResponse<MenuItem> {
        let started = self.begin().await;
        let result = self.store.write().await.create_menu_item(item, Utc::now());
        respond(PROVIDER, "CREATE_MENU_ITEM", started, result)
    }

    #[instrument(skip(self, update), fields(id = %id))]
    async fn update_menu_item(
        &self,
        id: &MenuItemId,
        update: &MenuItemUpdate,
    ) -> ApiResponse<MenuItem> {
        let started = self.begin().await;
        let result = self
            .store
            .write()
            .await
            .update_menu_item(id, update, Utc::now());
        respond(PROVIDER, "UPDATE_MENU_ITEM", started, result)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_menu_item(&self, id: &MenuItemId) -> ApiResponse<()> {
        let started = self.begin().await;
        let result = self.store.write().await.delete_menu_item(id);
        respond(PROVIDER, "DELETE_MENU_ITEM", started, result)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn update_menu_item_availability(
        &self,
        id: &MenuItemId,
        is_available: bool,
    ) -> ApiResponse<MenuItem> {
        let started = self.begin().await;
        let result = self
            .store
            .write()
            .await
            .set_menu_item_availability(id, is_available, Utc::now());
        respond(PROVIDER, "UPDATE_MENU_ITEM_AVAILABILITY", started, result)
    }

    async fn get_inventory_items(&self) -> ApiResponse<Vec<InventoryItem>> {
        let started = self.begin().await;
        let items = self.store.read().await.inventory_items();
        respond(PROVIDER, "GET_INVENTORY_ITEMS", started, Ok(items))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_inventory_item(&self, id: &InventoryItemId) -> ApiResponse<InventoryItem> {
        let started = self.begin().await;
        let result = self.store.read().await.inventory_item(id);
        respond(PROVIDER, "GET_INVENTORY_ITEM", started, result)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn update_inventory_level(
        &self,
        id: &InventoryItemId,
        quantity: Decimal,
    ) -> ApiResponse<InventoryItem> {
        let started = self.begin().await;
        let result = self
            .store
            .write()
            .await
            .set_inventory_level(id, quantity, Utc::now());
        respond(PROVIDER, "UPDATE_INVENTORY_LEVEL", started, result)
    }

    async fn get_employees(&self) -> ApiResponse<Vec<Employee>> {
        let started = self.begin().await;
        let employees = self.store.read().await.employees();
        respond(PROVIDER, "GET_EMPLOYEES", started, Ok(employees))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_employee(&self, id: &EmployeeId) -> ApiResponse<Employee> {
        let started = self.begin().await;
        let result = self.store.read().await.employee(id);
        respond(PROVIDER, "GET_EMPLOYEE", started, result)
    }

    #[instrument(skip(self))]
    async fn get_employee_shifts(&self, query: &ShiftQuery) -> ApiResponse<Vec<Shift>> {
        let started = self.begin().await;
        let shifts = self.store.read().await.shifts(query);
        respond(PROVIDER, "GET_EMPLOYEE_SHIFTS", started, Ok(shifts))
    }

    #[instrument(skip(self), fields(employee_id = %employee_id))]
    async fn start_shift(&self, employee_id: &EmployeeId) -> ApiResponse<Shift> {
        let started = self.begin().await;
        let result = self.store.write().await.start_shift(employee_id, Utc::now());
        respond(PROVIDER, "START_SHIFT", started, result)
    }

    #[instrument(skip(self), fields(shift_id = %shift_id))]
    async fn end_shift(&self, shift_id: &ShiftId) -> ApiResponse<Shift> {
        let started = self.begin().await;
        let result = self.store.write().await.end_shift(shift_id, Utc::now());
        respond(PROVIDER, "END_SHIFT", started, result)
    }

    #[instrument(skip(self))]
    async fn get_orders(&self, query: &OrderQuery) -> ApiResponse<Vec<Order>> {
        let started = self.begin().await;
        let orders = self.store.read().await.orders(query);
        respond(PROVIDER, "GET_ORDERS", started, Ok(orders))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_order(&self, id: &OrderId) -> ApiResponse<Order> {
        let started = self.begin().await;
        let result = self.store.read().await.order(id);
        respond(PROVIDER, "GET_ORDER", started, result)
    }

    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    async fn create_order(&self, order: &NewOrder) -> ApiResponse<Order> {
        let started = self.begin().await;
        let result = self.store.write().await.create_order(order, Utc::now());
        respond(PROVIDER, "CREATE_ORDER", started, result)
    }

    #[instrument(skip(self), fields(id = %id, status = %status))]
    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> ApiResponse<Order> {
        let started = self.begin().await;
        let result = self
            .store
            .write()
            .await
            .update_order_status(id, status, Utc::now());
        respond(PROVIDER, "UPDATE_ORDER_STATUS", started, result)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn cancel_order(&self, id: &OrderId, reason: Option<&str>) -> ApiResponse<Order> {
        let started = self.begin().await;
        let result = self
            .store
            .write()
            .await
            .cancel_order(id, reason, Utc::now());
        respond(PROVIDER, "CANCEL_ORDER", started, result)
    }

    #[instrument(skip(self, request), fields(order_id = %request.order_id, amount = %request.amount))]
    async fn process_payment(&self, request: &PaymentRequest) -> ApiResponse<PaymentResult> {
        let started = self.begin().await;
        let approved = !self.should_fail();
        let result = self
            .store
            .write()
            .await
            .record_payment(request, approved, Utc::now());
        if !approved {
            debug!("Simulated payment decline");
        }
        respond(PROVIDER, "PROCESS_PAYMENT", started, result)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn refund_transaction(
        &self,
        id: &TransactionId,
        amount: Option<Decimal>,
        reason: Option<&str>,
    ) -> ApiResponse<Transaction> {
        let started = self.begin().await;
        let result = self
            .store
            .write()
            .await
            .refund(id, amount, reason, Utc::now());
        respond(PROVIDER, "REFUND_TRANSACTION", started, result)
    }

    #[instrument(skip(self, events))]
    async fn register_webhook(
        &self,
        url: &str,
        events: &[String],
    ) -> ApiResponse<WebhookRegistration> {
        let started = self.begin().await;
        let result = self
            .store
            .write()
            .await
            .register_webhook(url, events, Utc::now());
        respond(PROVIDER, "REGISTER_WEBHOOK", started, result)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn unregister_webhook(&self, id: &WebhookId) -> ApiResponse<()> {
        let started = self.begin().await;
        let result = self.store.write().await.unregister_webhook(id);
        respond(PROVIDER, "UNREGISTER_WEBHOOK", started, result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn adapter(options: MockOptions) -> MockAdapter {
        let anchor = Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0).unwrap();
        MockAdapter::new(options, anchor)
    }

    #[test]
    fn test_default_options() {
        let options = MockOptions::default();
        assert_eq!(options.latency, Duration::from_millis(100));
        assert_eq!(options.jitter, Duration::from_millis(200));
        assert!((options.failure_rate - 0.05).abs() < f64::EPSILON);
        assert_eq!(options.seed, 42);
    }

    #[tokio::test]
    async fn test_connect_is_idempotent() {
        let mock = adapter(MockOptions::instant());
        let first = mock.connect().await.into_result().unwrap();
        let second = mock.connect().await.into_result().unwrap();
        assert!(first.is_connected);
        assert_eq!(
            first.last_successful_connection,
            second.last_successful_connection
        );

        mock.disconnect().await.into_result().unwrap();
        let status = mock.disconnect().await.into_result().unwrap();
        assert!(!status.is_connected);
    }

    #[tokio::test]
    async fn test_forced_connection_failure() {
        let mock = adapter(MockOptions::instant().with_failure_rate(1.0));
        let response = mock.test_connection().await;
        assert!(!response.success);
        assert_eq!(response.error_code(), Some("MOCK_CONNECTION_FAILED"));
        assert!(response.metadata.is_some());
    }

    #[tokio::test]
    async fn test_unknown_order_is_prefixed_not_found() {
        let mock = adapter(MockOptions::instant());
        let response = mock.get_order(&OrderId::new("ord-0")).await;
        assert_eq!(response.error_code(), Some("MOCK_ORDER_NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_inverted_sales_range_rejected() {
        let mock = adapter(MockOptions::instant());
        let anchor = mock.anchor().await;
        let response = mock
            .get_sales_data(anchor, anchor - chrono::Duration::days(1), ReportPeriod::Day)
            .await;
        assert_eq!(response.error_code(), Some("MOCK_INVALID_REQUEST"));
    }

    #[tokio::test]
    async fn test_webhooks_round_trip() {
        let mock = adapter(MockOptions::instant());
        let registration = mock
            .register_webhook("https://hooks.example.com/pos", &["order.created".to_string()])
            .await
            .into_result()
            .unwrap();
        assert_eq!(registration.id.as_str(), "wh-001");

        assert!(mock.unregister_webhook(&registration.id).await.success);
        let again = mock.unregister_webhook(&registration.id).await;
        assert_eq!(again.error_code(), Some("MOCK_WEBHOOK_NOT_FOUND"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let mock = adapter(
            MockOptions::instant().with_latency(Duration::from_millis(250), Duration::ZERO),
        );
        let before = tokio::time::Instant::now();
        mock.get_menu_items().await.into_result().unwrap();
        assert!(before.elapsed() >= Duration::from_millis(250));
    }
}
