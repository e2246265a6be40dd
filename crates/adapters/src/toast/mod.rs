//! Toast adapter.
//!
//! Toast exposes menus, stock, labor and orders to partner integrations but
//! keeps catalog editing, clock-in/out, order state and payments inside its
//! own terminals. Those operations answer `TOAST_<OPERATION>_NOT_SUPPORTED`.
//!
//! Every request is scoped to one restaurant, identified by the
//! `Toast-Restaurant-External-ID` header taken from the API secret.

mod conversions;
pub mod mapping;
mod types;

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use pos_bridge_core::{
    ApiResponse, ConnectionStatus, ConnectionTest, Employee, EmployeeId, InventoryItem,
    InventoryItemId, MenuItem, MenuItemId, MenuItemUpdate, NewMenuItem, NewOrder, Order,
    OrderId, OrderQuery, OrderStatus, PaymentRequest, PaymentResult, PosProvider, ReportPeriod,
    SalesData, Shift, ShiftId, ShiftQuery, Transaction, TransactionId, TransactionQuery,
    within_range,
};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use self::types::{
    Job, MenusResponse, Restaurant, StockEntry, StockUpdate, TimeEntry, ToastEmployee,
    ToastOrder,
};
use crate::adapter::PosAdapter;
use crate::config::NormalizedConfig;
use crate::connection::ConnectionState;
use crate::error::{NotFoundExt, PosError, not_supported, respond};
use crate::http::{HttpClient, HttpError, bearer_headers};
use crate::reporting::aggregate_sales;

const PROVIDER: PosProvider = PosProvider::Toast;

/// Header naming the restaurant a request is scoped to.
pub const RESTAURANT_HEADER: &str = "toast-restaurant-external-id";

/// Page size requested from `ordersBulk`.
const PAGE_SIZE: usize = 100;

/// Look-back used when a read omits its start date.
const DEFAULT_WINDOW_DAYS: i64 = 30;

/// [`PosAdapter`] for Toast.
#[derive(Debug)]
pub struct ToastAdapter {
    http: HttpClient,
    connection: ConnectionState,
    restaurant_guid: String,
}

impl ToastAdapter {
    /// Create an adapter. Performs no network I/O.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` if a credential is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: NormalizedConfig) -> Result<Self, HttpError> {
        let retry = config.retry_policy();
        let token = config
            .api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .unwrap_or_default();
        let restaurant_guid = config
            .api_secret
            .as_ref()
            .map(|s| s.expose_secret().to_string())
            .unwrap_or_default();
        let headers = bearer_headers(token, &[(RESTAURANT_HEADER, restaurant_guid.as_str())])?;

        Ok(Self {
            http: HttpClient::new(config.base_url, headers, config.timeout, retry)?,
            connection: ConnectionState::default(),
            restaurant_guid,
        })
    }

    async fn finish<T>(
        &self,
        operation: &'static str,
        started: Instant,
        result: Result<T, PosError>,
    ) -> ApiResponse<T> {
        self.connection
            .record_rate_limit(self.http.rate_limit().await)
            .await;
        respond(PROVIDER, operation, started, result)
    }

    async fn restaurant(&self) -> Result<Restaurant, PosError> {
        let restaurant: Restaurant = self
            .http
            .get(
                &format!("/restaurants/v1/restaurants/{}", self.restaurant_guid),
                &[],
            )
            .await
            .or_not_found("RESTAURANT", &self.restaurant_guid)?;
        debug!(
            name = restaurant.general.as_ref().and_then(|g| g.name.as_deref()),
            "Resolved Toast restaurant"
        );
        Ok(restaurant)
    }

    // =========================================================================
    // Menus and stock
    // =========================================================================

    async fn menus(&self) -> Result<MenusResponse, PosError> {
        Ok(self.http.get("/menus/v2/menus", &[]).await?)
    }

    async fn stock(&self) -> Result<Vec<StockEntry>, PosError> {
        Ok(self.http.get("/stock/v1/inventory", &[]).await?)
    }

    /// Menu items with their stock entries, fetched concurrently.
    async fn catalog(&self) -> Result<(Vec<MenuItem>, Vec<StockEntry>), PosError> {
        let (menus, stock) = tokio::join!(self.menus(), self.stock());
        let stock = stock?;
        let by_item: HashMap<&str, &StockEntry> =
            stock.iter().map(|s| (s.guid.as_str(), s)).collect();
        let items = conversions::menu_items(&menus?, &by_item);
        Ok((items, stock))
    }

    async fn menu_items(&self) -> Result<Vec<MenuItem>, PosError> {
        Ok(self.catalog().await?.0)
    }

    async fn menu_item(&self, id: &MenuItemId) -> Result<MenuItem, PosError> {
        self.menu_items()
            .await?
            .into_iter()
            .find(|item| item.id == *id)
            .ok_or_else(|| PosError::not_found("MENU_ITEM", id))
    }

    async fn set_availability(
        &self,
        id: &MenuItemId,
        is_available: bool,
    ) -> Result<MenuItem, PosError> {
        let (items, stock) = self.catalog().await?;
        let item = items
            .into_iter()
            .find(|item| item.id == *id)
            .ok_or_else(|| PosError::not_found("MENU_ITEM", id))?;
        if item.is_available == is_available {
            return Ok(item);
        }

        let update = StockUpdate {
            guid: id.to_string(),
            status: if is_available {
                mapping::STOCK_IN
            } else {
                mapping::STOCK_OUT
            },
            quantity: None,
            version_id: stock
                .into_iter()
                .find(|s| s.guid == id.as_str())
                .and_then(|s| s.version_id),
        };
        let _: Vec<StockEntry> = self
            .http
            .put("/stock/v1/inventory/update", &[update])
            .await
            .or_not_found("MENU_ITEM", id)?;
        self.menu_item(id).await
    }

    async fn inventory(&self) -> Result<Vec<InventoryItem>, PosError> {
        let (items, stock) = self.catalog().await?;
        let by_id: HashMap<&str, &MenuItem> =
            items.iter().map(|i| (i.id.as_str(), i)).collect();
        let now = Utc::now();
        Ok(stock
            .iter()
            .filter(|s| s.status == mapping::STOCK_QUANTITY)
            .map(|s| conversions::inventory_item(s, by_id.get(s.guid.as_str()).copied(), now))
            .collect())
    }

    async fn inventory_item(&self, id: &InventoryItemId) -> Result<InventoryItem, PosError> {
        self.inventory()
            .await?
            .into_iter()
            .find(|item| item.id == *id)
            .ok_or_else(|| PosError::not_found("INVENTORY_ITEM", id))
    }

    // =========================================================================
    // Labor
    // =========================================================================

    async fn jobs(&self) -> Result<Vec<Job>, PosError> {
        Ok(self.http.get("/labor/v1/jobs", &[]).await?)
    }

    async fn employees(&self) -> Result<Vec<Employee>, PosError> {
        let (employees, jobs) = tokio::join!(
            self.http.get::<Vec<ToastEmployee>>("/labor/v1/employees", &[]),
            self.jobs()
        );
        let jobs = jobs?;
        let by_guid: HashMap<&str, &Job> = jobs.iter().map(|j| (j.guid.as_str(), j)).collect();
        Ok(employees?
            .iter()
            .map(|e| conversions::employee(e, &by_guid))
            .collect())
    }

    async fn employee(&self, id: &EmployeeId) -> Result<Employee, PosError> {
        let path = format!("/labor/v1/employees/{id}");
        let (employee, jobs) = tokio::join!(
            self.http.get::<ToastEmployee>(&path, &[]),
            self.jobs()
        );
        let employee = employee.or_not_found("EMPLOYEE", id)?;
        let jobs = jobs?;
        let by_guid: HashMap<&str, &Job> = jobs.iter().map(|j| (j.guid.as_str(), j)).collect();
        Ok(conversions::employee(&employee, &by_guid))
    }

    async fn shifts(&self, query: &ShiftQuery) -> Result<Vec<Shift>, PosError> {
        let (start, end) = window(query.start, query.end)?;
        let entries: Vec<TimeEntry> = self
            .http
            .get(
                "/labor/v1/timeEntries",
                &[("startDate", toast_time(start)), ("endDate", toast_time(end))],
            )
            .await?;
        Ok(entries
            .iter()
            .filter(|e| !e.deleted)
            .filter(|e| {
                query
                    .employee_id
                    .as_ref()
                    .is_none_or(|id| e.employee_reference.guid == id.as_str())
            })
            .map(conversions::shift)
            .collect())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Orders opened in `[start, end]`, newest first, at most `cap`.
    /// Every order in the window, newest first. Pages until `ordersBulk`
    /// returns a short page.
    async fn orders_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ToastOrder>, PosError> {
        let mut orders = Vec::new();
        let mut page = 1_usize;
        loop {
            let batch: Vec<ToastOrder> = self
                .http
                .get(
                    "/orders/v2/ordersBulk",
                    &[
                        ("startDate", toast_time(start)),
                        ("endDate", toast_time(end)),
                        ("pageSize", PAGE_SIZE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;
            let last = batch.len() < PAGE_SIZE;
            orders.extend(batch);
            if last {
                break;
            }
            page += 1;
        }
        debug!(pages = page, orders = orders.len(), "Scanned Toast orders");
        orders.sort_by(|a, b| {
            let at = |o: &ToastOrder| o.created_date.or(o.opened_date);
            at(b).cmp(&at(a))
        });
        Ok(orders)
    }

    async fn orders(&self, query: &OrderQuery) -> Result<Vec<Order>, PosError> {
        let (start, end) = window(query.start, query.end)?;
        let mut orders = Vec::new();
        for toast in self.orders_between(start, end).await? {
            if orders.len() >= query.limit {
                break;
            }
            let order = conversions::order(&toast)?;
            if query.status.is_none_or(|status| order.status == status) {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    async fn toast_order(&self, id: &OrderId) -> Result<ToastOrder, PosError> {
        self.http
            .get(&format!("/orders/v2/orders/{id}"), &[])
            .await
            .or_not_found("ORDER", id)
    }

    async fn place_order(&self, order: &NewOrder) -> Result<Order, PosError> {
        let body = conversions::new_order(order)?;
        let created: ToastOrder = self.http.post("/orders/v2/orders", &body).await?;
        debug!(order_guid = %created.guid, "Created Toast order");
        conversions::order(&created)
    }

    async fn transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, PosError> {
        let (start, end) = window(query.start, query.end)?;
        let mut transactions: Vec<Transaction> = self
            .orders_between(start, end)
            .await?
            .iter()
            .flat_map(conversions::transactions)
            .filter(|t| within_range(t.processed_at, query.start, query.end))
            .collect();
        transactions.sort_by(|a, b| b.processed_at.cmp(&a.processed_at));
        Ok(transactions
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn sales(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: ReportPeriod,
    ) -> Result<SalesData, PosError> {
        if start > end {
            return Err(PosError::InvalidRequest(format!(
                "start {start} is after end {end}"
            )));
        }
        let (toast_orders, menus) =
            tokio::join!(self.orders_between(start, end), self.menus());
        let toast_orders = toast_orders?;
        let items = conversions::menu_items(&menus?, &HashMap::new());
        let names: HashMap<&str, &str> = items
            .iter()
            .map(|i| (i.id.as_str(), i.name.as_str()))
            .collect();

        let mut orders = toast_orders
            .iter()
            .map(conversions::order)
            .collect::<Result<Vec<_>, _>>()?;
        for line in orders
            .iter_mut()
            .flat_map(|o| o.items.iter_mut())
            .filter(|line| line.name.is_empty())
        {
            if let Some(name) = names.get(line.menu_item_id.as_str()) {
                line.name = (*name).to_string();
            }
        }
        let transactions: Vec<Transaction> = toast_orders
            .iter()
            .flat_map(conversions::transactions)
            .collect();
        Ok(aggregate_sales(period, start, end, &orders, &transactions))
    }
}

/// Toast's timestamp format, e.g. `2026-04-01T00:00:00.000+0000`.
fn toast_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string()
}

/// Resolve an optional date range; the start defaults to 30 days before the end.
fn window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), PosError> {
    let end = end.unwrap_or_else(Utc::now);
    let start = start.unwrap_or(end - Duration::days(DEFAULT_WINDOW_DAYS));
    if start > end {
        return Err(PosError::InvalidRequest(format!(
            "start {start} is after end {end}"
        )));
    }
    Ok((start, end))
}

impl PosAdapter for ToastAdapter {
    fn provider(&self) -> PosProvider {
        PROVIDER
    }

    #[instrument(skip(self))]
    async fn connect(&self) -> ApiResponse<ConnectionStatus> {
        let started = Instant::now();
        let result = self
            .connection
            .connect_with(|| async { self.restaurant().await.map(|_| ()) })
            .await;
        self.finish("CONNECT", started, result).await
    }

    #[instrument(skip(self))]
    async fn disconnect(&self) -> ApiResponse<ConnectionStatus> {
        let started = Instant::now();
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
        let started = Instant::now();
        let result = self.restaurant().await.map(|_| ConnectionTest {
            latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        });
        self.finish("TEST_CONNECTION", started, result).await
    }

    #[instrument(skip(self))]
    async fn get_sales_data(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: ReportPeriod,
    ) -> ApiResponse<SalesData> {
        let started = Instant::now();
        let result = self.sales(start, end, period).await;
        self.finish("GET_SALES_DATA", started, result).await
    }

    #[instrument(skip(self))]
    async fn get_transactions(&self, query: &TransactionQuery) -> ApiResponse<Vec<Transaction>> {
        let started = Instant::now();
        let result = self.transactions(query).await;
        self.finish("GET_TRANSACTIONS", started, result).await
    }

    #[instrument(skip(self))]
    async fn get_menu_items(&self) -> ApiResponse<Vec<MenuItem>> {
        let started = Instant::now();
        let result = self.menu_items().await;
        self.finish("GET_MENU_ITEMS", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_menu_item(&self, id: &MenuItemId) -> ApiResponse<MenuItem> {
        let started = Instant::now();
        let result = self.menu_item(id).await;
        self.finish("GET_MENU_ITEM", started, result).await
    }

    async fn create_menu_item(&self, _item: &NewMenuItem) -> ApiResponse<MenuItem> {
        not_supported(PROVIDER, "CREATE_MENU_ITEM")
    }

    async fn update_menu_item(
        &self,
        _id: &MenuItemId,
        _update: &MenuItemUpdate,
    ) -> ApiResponse<MenuItem> {
        not_supported(PROVIDER, "UPDATE_MENU_ITEM")
    }

    async fn delete_menu_item(&self, _id: &MenuItemId) -> ApiResponse<()> {
        not_supported(PROVIDER, "DELETE_MENU_ITEM")
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn update_menu_item_availability(
        &self,
        id: &MenuItemId,
        is_available: bool,
    ) -> ApiResponse<MenuItem> {
        let started = Instant::now();
        let result = self.set_availability(id, is_available).await;
        self.finish("UPDATE_MENU_ITEM_AVAILABILITY", started, result)
            .await
    }

    #[instrument(skip(self))]
    async fn get_inventory_items(&self) -> ApiResponse<Vec<InventoryItem>> {
        let started = Instant::now();
        let result = self.inventory().await;
        self.finish("GET_INVENTORY_ITEMS", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_inventory_item(&self, id: &InventoryItemId) -> ApiResponse<InventoryItem> {
        let started = Instant::now();
        let result = self.inventory_item(id).await;
        self.finish("GET_INVENTORY_ITEM", started, result).await
    }

    async fn update_inventory_level(
        &self,
        _id: &InventoryItemId,
        _quantity: Decimal,
    ) -> ApiResponse<InventoryItem> {
        not_supported(PROVIDER, "UPDATE_INVENTORY_LEVEL")
    }

    #[instrument(skip(self))]
    async fn get_employees(&self) -> ApiResponse<Vec<Employee>> {
        let started = Instant::now();
        let result = self.employees().await;
        self.finish("GET_EMPLOYEES", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_employee(&self, id: &EmployeeId) -> ApiResponse<Employee> {
        let started = Instant::now();
        let result = self.employee(id).await;
        self.finish("GET_EMPLOYEE", started, result).await
    }

    #[instrument(skip(self))]
    async fn get_employee_shifts(&self, query: &ShiftQuery) -> ApiResponse<Vec<Shift>> {
        let started = Instant::now();
        let result = self.shifts(query).await;
        self.finish("GET_EMPLOYEE_SHIFTS", started, result).await
    }

    async fn start_shift(&self, _employee_id: &EmployeeId) -> ApiResponse<Shift> {
        not_supported(PROVIDER, "START_SHIFT")
    }

    async fn end_shift(&self, _shift_id: &ShiftId) -> ApiResponse<Shift> {
        not_supported(PROVIDER, "END_SHIFT")
    }

    #[instrument(skip(self))]
    async fn get_orders(&self, query: &OrderQuery) -> ApiResponse<Vec<Order>> {
        let started = Instant::now();
        let result = self.orders(query).await;
        self.finish("GET_ORDERS", started, result).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_order(&self, id: &OrderId) -> ApiResponse<Order> {
        let started = Instant::now();
        let result = self
            .toast_order(id)
            .await
            .and_then(|toast| conversions::order(&toast));
        self.finish("GET_ORDER", started, result).await
    }

    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    async fn create_order(&self, order: &NewOrder) -> ApiResponse<Order> {
        let started = Instant::now();
        let result = self.place_order(order).await;
        self.finish("CREATE_ORDER", started, result).await
    }

    async fn update_order_status(
        &self,
        _id: &OrderId,
        _status: OrderStatus,
    ) -> ApiResponse<Order> {
        not_supported(PROVIDER, "UPDATE_ORDER_STATUS")
    }

    async fn cancel_order(&self, _id: &OrderId, _reason: Option<&str>) -> ApiResponse<Order> {
        not_supported(PROVIDER, "CANCEL_ORDER")
    }

    async fn process_payment(&self, _request: &PaymentRequest) -> ApiResponse<PaymentResult> {
        not_supported(PROVIDER, "PROCESS_PAYMENT")
    }

    async fn refund_transaction(
        &self,
        _id: &TransactionId,
        _amount: Option<Decimal>,
        _reason: Option<&str>,
    ) -> ApiResponse<Transaction> {
        not_supported(PROVIDER, "REFUND_TRANSACTION")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pos_bridge_core::Environment;
    use secrecy::SecretString;
    use url::Url;

    use super::*;

    fn config(api_key: &str, restaurant: &str) -> NormalizedConfig {
        NormalizedConfig {
            provider: PosProvider::Toast,
            environment: Environment::Sandbox,
            api_key: Some(SecretString::from(api_key.to_string())),
            api_secret: Some(SecretString::from(restaurant.to_string())),
            base_url: Url::parse("https://ws-sandbox-api.eng.toasttab.com").unwrap(),
            timeout: std::time::Duration::from_secs(5),
            retry_attempts: 0,
            webhook_url: None,
        }
    }

    #[test]
    fn test_new_rejects_unprintable_restaurant() {
        assert!(ToastAdapter::new(config("token", "rest-guid")).is_ok());
        assert!(matches!(
            ToastAdapter::new(config("token", "rest\nguid")),
            Err(HttpError::Header(_))
        ));
    }

    #[test]
    fn test_toast_time_format() {
        let at = DateTime::parse_from_rfc3339("2026-04-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(toast_time(at), "2026-04-01T09:30:00.000+0000");
    }

    #[test]
    fn test_window_defaults_to_thirty_days() {
        let end = DateTime::parse_from_rfc3339("2026-04-30T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let (start, resolved_end) = window(None, Some(end)).unwrap();
        assert_eq!(resolved_end, end);
        assert_eq!(end - start, Duration::days(30));

        assert!(matches!(
            window(Some(end), Some(end - Duration::days(1))),
            Err(PosError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_write_operations_are_not_supported() {
        let adapter = ToastAdapter::new(config("token", "rest-guid")).unwrap();

        let cancelled = adapter.cancel_order(&OrderId::new("o-1"), None).await;
        assert!(!cancelled.success);
        assert_eq!(cancelled.error_code(), Some("TOAST_CANCEL_ORDER_NOT_SUPPORTED"));

        let shift = adapter.start_shift(&EmployeeId::new("e-1")).await;
        assert_eq!(shift.error_code(), Some("TOAST_START_SHIFT_NOT_SUPPORTED"));

        let refund = adapter
            .refund_transaction(&TransactionId::new("t-1"), None, None)
            .await;
        assert!(refund.error.unwrap().is_not_supported());
    }
}
