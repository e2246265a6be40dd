//! Toast adapter against a fake Toast API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{DateTime, Duration, TimeZone, Utc};
use pos_bridge_adapters::PosAdapter;
use pos_bridge_adapters::toast::RESTAURANT_HEADER;
use pos_bridge_core::{
    EmployeeId, InventoryItemId, MenuItemId, OrderId, OrderQuery, OrderStatus, OrderType,
    PaymentMethod, PosProvider, ReportPeriod, ShiftId, ShiftQuery, ShiftStatus, TransactionQuery,
    TransactionStatus, WebhookId,
};
use pos_bridge_integration_tests::{FakeVendor, TEST_RESTAURANT, TEST_TOKEN, toast_adapter};
use rust_decimal::Decimal;
use serde_json::{Value, json};

// =============================================================================
// Fake Toast
// =============================================================================

#[derive(Clone)]
struct FakeToast {
    stock: Arc<Mutex<Vec<Value>>>,
    stock_updates: Arc<Mutex<Vec<Value>>>,
    orders: Arc<Vec<Value>>,
}

impl FakeToast {
    fn new(orders: Vec<Value>) -> Self {
        Self {
            stock: Arc::new(Mutex::new(vec![
                json!({ "guid": "item-burger", "status": "IN_STOCK" }),
                json!({ "guid": "item-fries", "status": "QUANTITY", "quantity": 12.0, "versionId": "v-fries-1" }),
                json!({ "guid": "item-shake", "status": "OUT_OF_STOCK", "versionId": "v-shake-3" }),
            ])),
            stock_updates: Arc::new(Mutex::new(Vec::new())),
            orders: Arc::new(orders),
        }
    }

    fn stock_updates(&self) -> Vec<Value> {
        self.stock_updates.lock().unwrap().clone()
    }
}

fn menus() -> Value {
    json!({
        "menus": [{
            "guid": "menu-dinner",
            "name": "Dinner",
            "menuGroups": [
                {
                    "guid": "grp-burgers",
                    "name": "Burgers",
                    "menuItems": [{
                        "guid": "item-burger",
                        "name": "Classic Burger",
                        "description": "",
                        "price": 12.5,
                        "sku": "BRG-1",
                        "modifierGroupReferences": [1]
                    }],
                    "menuGroups": [{
                        "guid": "grp-sides",
                        "name": "Sides",
                        "menuItems": [{ "guid": "item-fries", "name": "Fries", "price": 4.0, "sku": "FRY-1" }]
                    }]
                },
                {
                    "guid": "grp-drinks",
                    "name": "Drinks",
                    "menuItems": [
                        { "guid": "item-shake", "name": "Milkshake", "price": 6.5 },
                        { "guid": "item-burger", "name": "Classic Burger", "price": 12.5 }
                    ]
                }
            ]
        }],
        "modifierGroupReferences": {
            "1": {
                "guid": "mg-temp",
                "name": "Temperature",
                "minSelections": 1,
                "modifierOptionReferences": [10, 11]
            }
        },
        "modifierOptionReferences": {
            "10": { "guid": "opt-rare", "name": "Rare" },
            "11": { "guid": "opt-well", "name": "Well Done", "price": 0.5 }
        }
    })
}

fn employees() -> Value {
    json!([
        {
            "guid": "emp-1",
            "firstName": "Ana",
            "lastName": "Lopez",
            "email": "ana@example.com",
            "jobReferences": [{ "guid": "job-server" }],
            "wageOverrides": [{ "jobReference": { "guid": "job-server" }, "wage": 17.25 }],
            "createdDate": "2025-06-01T12:00:00Z"
        },
        {
            "guid": "emp-2",
            "firstName": "Ben",
            "lastName": "Ortiz",
            "jobReferences": [{ "guid": "job-gm" }]
        },
        {
            "guid": "emp-3",
            "firstName": "Cleo",
            "lastName": "Park",
            "deleted": true,
            "jobReferences": [{ "guid": "job-cook" }]
        }
    ])
}

fn jobs() -> Value {
    json!([
        { "guid": "job-server", "title": "Server", "defaultWage": 15.0, "wageFrequency": "HOURLY" },
        { "guid": "job-gm", "title": "General Manager", "defaultWage": 65000.0, "wageFrequency": "SALARY" },
        { "guid": "job-cook", "title": "Line Cook", "defaultWage": 19.0, "wageFrequency": "HOURLY" }
    ])
}

fn time_entries() -> Value {
    json!([
        {
            "guid": "te-1",
            "employeeReference": { "guid": "emp-1" },
            "inDate": "2026-04-30T09:00:00Z",
            "outDate": "2026-04-30T17:30:00Z",
            "hourlyWage": 17.25,
            "breaks": [
                { "inDate": "2026-04-30T12:00:00Z", "outDate": "2026-04-30T12:30:00Z", "paid": false },
                { "inDate": "2026-04-30T15:00:00Z", "outDate": "2026-04-30T15:10:00Z", "paid": true }
            ]
        },
        {
            "guid": "te-2",
            "employeeReference": { "guid": "emp-2" },
            "inDate": "2026-04-30T16:00:00Z"
        },
        {
            "guid": "te-3",
            "employeeReference": { "guid": "emp-1" },
            "inDate": "2026-04-29T09:00:00Z",
            "outDate": "2026-04-29T10:00:00Z",
            "deleted": true
        }
    ])
}

/// A closed take-out order: one burger at 10.00, 0.80 tax, paid by card with a 2.00 tip.
fn toast_order(guid: &str, created: DateTime<Utc>) -> Value {
    let created = created.to_rfc3339();
    json!({
        "guid": guid,
        "displayNumber": "42",
        "createdDate": created,
        "diningOption": { "behavior": "TAKE_OUT" },
        "checks": [{
            "guid": format!("chk-{guid}"),
            "amount": 10.0,
            "taxAmount": 0.8,
            "totalAmount": 10.8,
            "paymentStatus": "CLOSED",
            "selections": [{
                "guid": format!("sel-{guid}"),
                "item": { "guid": "item-burger" },
                "displayName": "Classic Burger",
                "quantity": 1.0,
                "price": 10.0,
                "fulfillmentStatus": "READY"
            }],
            "payments": [{
                "guid": format!("pay-{guid}"),
                "paidDate": created,
                "amount": 10.8,
                "tipAmount": 2.0,
                "type": "CREDIT",
                "paymentStatus": "CAPTURED",
                "last4Digits": "4242"
            }]
        }]
    })
}

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, day, hour, minute, 0).unwrap()
}

fn ready_order() -> Value {
    let mut order = toast_order("ord-ready", at(30, 18, 0));
    order["approvalStatus"] = json!("APPROVED");
    order["diningOption"]["behavior"] = json!("DINE_IN");
    order["table"] = json!({ "name": "12" });
    order["server"] = json!({ "guid": "emp-1" });
    order["checks"][0]["paymentStatus"] = json!("OPEN");
    order["checks"][0]["payments"] = json!([]);
    order
}

fn refunded_order() -> Value {
    let mut order = toast_order("ord-refunded", at(29, 12, 0));
    order["checks"][0]["payments"][0]["refundStatus"] = json!("FULL");
    order["checks"][0]["payments"][0]["refund"] = json!({
        "refundAmount": 10.8,
        "tipRefundAmount": 2.0,
        "refundDate": at(29, 14, 0).to_rfc3339()
    });
    order
}

fn voided_order() -> Value {
    let mut order = toast_order("ord-void", at(28, 9, 0));
    order["voided"] = json!(true);
    order["checks"][0]["payments"] = json!([]);
    order
}

/// Orders a minute apart, oldest first, ending at `newest`.
fn order_history(count: usize, newest: DateTime<Utc>) -> Vec<Value> {
    (0..count)
        .map(|n| {
            let minutes_back = i64::try_from(count - 1 - n).unwrap();
            toast_order(&format!("ord-{n:04}"), newest - Duration::minutes(minutes_back))
        })
        .collect()
}

async fn restaurant(Path(guid): Path<String>) -> Response {
    if guid == TEST_RESTAURANT {
        Json(json!({ "guid": guid, "general": { "name": "Harbor Grill" } })).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn stock(State(fake): State<FakeToast>) -> Json<Value> {
    Json(Value::Array(fake.stock.lock().unwrap().clone()))
}

async fn update_stock(
    State(fake): State<FakeToast>,
    Json(updates): Json<Vec<Value>>,
) -> Json<Value> {
    let mut stock = fake.stock.lock().unwrap();
    let mut changed = Vec::new();
    for update in &updates {
        if let Some(entry) = stock.iter_mut().find(|e| e["guid"] == update["guid"]) {
            entry["status"] = update["status"].clone();
            changed.push(entry.clone());
        }
    }
    fake.stock_updates.lock().unwrap().extend(updates);
    Json(Value::Array(changed))
}

async fn employee(Path(guid): Path<String>) -> Response {
    employees()
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["guid"] == guid.as_str())
        .map_or_else(
            || StatusCode::NOT_FOUND.into_response(),
            |e| Json(e.clone()).into_response(),
        )
}

async fn orders_bulk(
    State(fake): State<FakeToast>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let page: usize = params["page"].parse().unwrap();
    let page_size: usize = params["pageSize"].parse().unwrap();
    let batch: Vec<Value> = fake
        .orders
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();
    Json(Value::Array(batch))
}

async fn order(State(fake): State<FakeToast>, Path(guid): Path<String>) -> Response {
    fake.orders
        .iter()
        .find(|o| o["guid"] == guid.as_str())
        .map_or_else(
            || StatusCode::NOT_FOUND.into_response(),
            |o| Json(o.clone()).into_response(),
        )
}

/// Toast routes minus labor.
fn toast_routes(fake: FakeToast) -> Router {
    Router::new()
        .route("/restaurants/v1/restaurants/{guid}", get(restaurant))
        .route("/menus/v2/menus", get(|| async { Json(menus()) }))
        .route("/stock/v1/inventory", get(stock))
        .route("/stock/v1/inventory/update", put(update_stock))
        .route("/orders/v2/ordersBulk", get(orders_bulk))
        .route("/orders/v2/orders/{guid}", get(order))
        .with_state(fake)
}

fn toast_router(fake: FakeToast) -> Router {
    toast_routes(fake)
        .route("/labor/v1/employees", get(|| async { Json(employees()) }))
        .route("/labor/v1/employees/{guid}", get(employee))
        .route("/labor/v1/jobs", get(|| async { Json(jobs()) }))
        .route("/labor/v1/timeEntries", get(|| async { Json(time_entries()) }))
}

async fn spawn_toast(orders: Vec<Value>) -> (FakeVendor, FakeToast) {
    let fake = FakeToast::new(orders);
    let vendor = FakeVendor::spawn(toast_router(fake.clone())).await;
    (vendor, fake)
}

fn april() -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    (Some(at(1, 0, 0)), Some(at(30, 23, 59)))
}

// =============================================================================
// Connection
// =============================================================================

#[tokio::test]
async fn test_connect_scopes_requests_to_restaurant() {
    let (vendor, _) = spawn_toast(Vec::new()).await;
    let toast = toast_adapter(&vendor.base_url);

    assert!(toast.connect().await.into_result().unwrap().is_connected);
    assert!(toast.connect().await.success);

    let path = format!("/restaurants/v1/restaurants/{TEST_RESTAURANT}");
    assert_eq!(vendor.hits("GET", &path), 1);
    let request = &vendor.requests_to("GET", &path)[0];
    let bearer = format!("Bearer {TEST_TOKEN}");
    assert_eq!(request.header("authorization"), Some(bearer.as_str()));
    assert_eq!(request.header(RESTAURANT_HEADER), Some(TEST_RESTAURANT));

    assert!(toast.test_connection().await.success);
    assert_eq!(vendor.hits("GET", &path), 2);
}

#[tokio::test]
async fn test_unknown_restaurant_fails_connect() {
    let router = Router::new().route(
        "/restaurants/v1/restaurants/{guid}",
        get(|| async { StatusCode::NOT_FOUND }),
    );
    let vendor = FakeVendor::spawn(router).await;
    let toast = toast_adapter(&vendor.base_url);

    let response = toast.connect().await;
    assert!(!response.success);
    assert_eq!(response.error_code(), Some("TOAST_RESTAURANT_NOT_FOUND"));
    assert_eq!(response.metadata.unwrap().provider, PosProvider::Toast);

    let status = toast.get_connection_status().await.into_result().unwrap();
    assert!(!status.is_connected);
    assert!(status.connection_error.is_some());
}

// =============================================================================
// Menus and stock
// =============================================================================

#[tokio::test]
async fn test_menu_items_flatten_nested_groups() {
    let (vendor, _) = spawn_toast(Vec::new()).await;
    let toast = toast_adapter(&vendor.base_url);

    let items = toast.get_menu_items().await.into_result().unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Classic Burger", "Fries", "Milkshake"]);

    let burger = &items[0];
    assert_eq!(burger.category, "Burgers");
    assert_eq!(burger.price, Decimal::new(1250, 2));
    assert_eq!(burger.sku.as_deref(), Some("BRG-1"));
    assert!(burger.description.is_none());
    assert!(burger.is_available);

    let temperature = &burger.modifiers[0];
    assert_eq!(temperature.name, "Temperature");
    assert!(temperature.required);
    assert_eq!(temperature.min_selections, 1);
    assert_eq!(temperature.max_selections, 2);
    let prices: Vec<Decimal> = temperature.options.iter().map(|o| o.price).collect();
    assert_eq!(prices, [Decimal::ZERO, Decimal::new(50, 2)]);

    assert_eq!(items[1].category, "Sides");
    assert!(!items[2].is_available, "out-of-stock items are unavailable");

    let shake = toast
        .get_menu_item(&MenuItemId::new("item-shake"))
        .await
        .into_result()
        .unwrap();
    assert_eq!(shake.category, "Drinks");

    let missing = toast.get_menu_item(&MenuItemId::new("item-nope")).await;
    assert_eq!(missing.error_code(), Some("TOAST_MENU_ITEM_NOT_FOUND"));
}

#[tokio::test]
async fn test_availability_toggles_stock_status() {
    let (vendor, fake) = spawn_toast(Vec::new()).await;
    let toast = toast_adapter(&vendor.base_url);

    let shake = toast
        .update_menu_item_availability(&MenuItemId::new("item-shake"), true)
        .await
        .into_result()
        .unwrap();
    assert!(shake.is_available);
    assert_eq!(vendor.hits("PUT", "/stock/v1/inventory/update"), 1);

    let updates = fake.stock_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["guid"], "item-shake");
    assert_eq!(updates[0]["status"], "IN_STOCK");
    assert_eq!(updates[0]["versionId"], "v-shake-3");

    let burger = toast
        .update_menu_item_availability(&MenuItemId::new("item-burger"), true)
        .await;
    assert!(burger.success);
    assert_eq!(
        vendor.hits("PUT", "/stock/v1/inventory/update"),
        1,
        "already-available items are not written"
    );
}

#[tokio::test]
async fn test_inventory_covers_quantity_tracked_items() {
    let (vendor, _) = spawn_toast(Vec::new()).await;
    let toast = toast_adapter(&vendor.base_url);

    let inventory = toast.get_inventory_items().await.into_result().unwrap();
    assert_eq!(inventory.len(), 1);
    let fries = &inventory[0];
    assert_eq!(fries.id, InventoryItemId::new("item-fries"));
    assert_eq!(fries.name, "Fries");
    assert_eq!(fries.category.as_deref(), Some("Sides"));
    assert_eq!(fries.sku.as_deref(), Some("FRY-1"));
    assert_eq!(fries.current_stock, Decimal::from(12));
    assert_eq!(fries.unit, "each");

    assert!(toast.get_inventory_alerts().await.into_result().unwrap().is_empty());

    let burger = toast
        .get_inventory_item(&InventoryItemId::new("item-burger"))
        .await;
    assert_eq!(burger.error_code(), Some("TOAST_INVENTORY_ITEM_NOT_FOUND"));
}

// =============================================================================
// Labor
// =============================================================================

#[tokio::test]
async fn test_employees_take_role_and_rate_from_jobs() {
    let (vendor, _) = spawn_toast(Vec::new()).await;
    let toast = toast_adapter(&vendor.base_url);

    let staff = toast.get_employees().await.into_result().unwrap();
    assert_eq!(staff.len(), 3);

    let ana = &staff[0];
    assert_eq!(ana.full_name(), "Ana Lopez");
    assert_eq!(ana.role, "Server");
    assert_eq!(ana.hourly_rate, Some(Decimal::new(1725, 2)));
    assert!(ana.hire_date.is_some());

    let ben = &staff[1];
    assert_eq!(ben.role, "General Manager");
    assert!(ben.hourly_rate.is_none(), "salaried jobs have no hourly rate");

    let cleo = &staff[2];
    assert!(!cleo.is_active);
    assert_eq!(cleo.hourly_rate, Some(Decimal::from(19)));

    let one = toast
        .get_employee(&EmployeeId::new("emp-2"))
        .await
        .into_result()
        .unwrap();
    assert_eq!(one.last_name, "Ortiz");

    let missing = toast.get_employee(&EmployeeId::new("emp-9")).await;
    assert_eq!(missing.error_code(), Some("TOAST_EMPLOYEE_NOT_FOUND"));
}

#[tokio::test]
async fn test_time_entries_become_shifts() {
    let (vendor, _) = spawn_toast(Vec::new()).await;
    let toast = toast_adapter(&vendor.base_url);

    let shifts = toast
        .get_employee_shifts(&ShiftQuery::default())
        .await
        .into_result()
        .unwrap();
    let ids: Vec<&str> = shifts.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["te-1", "te-2"]);

    let closed = &shifts[0];
    assert_eq!(closed.status, ShiftStatus::Completed);
    assert_eq!(closed.break_minutes, 30, "paid breaks are not deducted");
    assert_eq!(closed.hours_worked, Some(Decimal::from(8)));
    assert_eq!(closed.total_pay, Some(Decimal::from(138)));

    assert_eq!(shifts[1].status, ShiftStatus::Active);
    assert!(shifts[1].end_time.is_none());

    let query = vendor.requests_to("GET", "/labor/v1/timeEntries")[0]
        .query
        .clone()
        .unwrap();
    assert!(query.contains("startDate="));
    assert!(query.contains("endDate="));

    let only_ben = toast
        .get_employee_shifts(&ShiftQuery {
            employee_id: Some(EmployeeId::new("emp-2")),
            ..ShiftQuery::default()
        })
        .await
        .into_result()
        .unwrap();
    assert_eq!(only_ben.len(), 1);
    assert_eq!(only_ben[0].id, ShiftId::new("te-2"));
}

// =============================================================================
// Orders and transactions
// =============================================================================

#[tokio::test]
async fn test_orders_page_through_bulk_endpoint() {
    let newest = at(30, 20, 0);
    let (vendor, _) = spawn_toast(order_history(103, newest)).await;
    let toast = toast_adapter(&vendor.base_url);
    let (start, end) = april();

    let orders = toast
        .get_orders(&OrderQuery {
            start,
            end,
            limit: 150,
            ..OrderQuery::default()
        })
        .await
        .into_result()
        .unwrap();
    assert_eq!(orders.len(), 103);
    assert_eq!(vendor.hits("GET", "/orders/v2/ordersBulk"), 2);

    let queries: Vec<String> = vendor
        .requests_to("GET", "/orders/v2/ordersBulk")
        .into_iter()
        .filter_map(|r| r.query)
        .collect();
    assert!(queries[0].contains("pageSize=100"));
    assert!(queries[0].contains("page=1"));
    assert!(queries[1].contains("page=2"));
    assert!(queries[0].contains("startDate=2026-04-01T00%3A00%3A00.000%2B0000"));

    assert!(orders.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    let latest = &orders[0];
    assert_eq!(latest.id, OrderId::new("ord-0102"));
    assert_eq!(latest.created_at, newest);
    assert_eq!(latest.status, OrderStatus::Completed);
    assert_eq!(latest.order_type, OrderType::Takeout);
    assert_eq!(latest.order_number, "42");
    assert_eq!(latest.subtotal, Decimal::from(10));
    assert_eq!(latest.tax, Decimal::new(80, 2));
    assert_eq!(latest.tip, Decimal::from(2));
    assert_eq!(latest.total, Decimal::new(1280, 2));
    assert_eq!(latest.items[0].unit_price, Decimal::from(10));

    let capped = toast
        .get_orders(&OrderQuery {
            start,
            end,
            limit: 10,
            ..OrderQuery::default()
        })
        .await
        .into_result()
        .unwrap();
    assert_eq!(capped.len(), 10);
    assert_eq!(capped[0].id, OrderId::new("ord-0102"));
}

#[tokio::test]
async fn test_order_status_follows_checks_and_selections() {
    let (vendor, _) =
        spawn_toast(vec![ready_order(), refunded_order(), voided_order()]).await;
    let toast = toast_adapter(&vendor.base_url);
    let (start, end) = april();

    let orders = toast
        .get_orders(&OrderQuery {
            start,
            end,
            ..OrderQuery::default()
        })
        .await
        .into_result()
        .unwrap();
    let statuses: Vec<(&str, OrderStatus)> =
        orders.iter().map(|o| (o.id.as_str(), o.status)).collect();
    assert_eq!(
        statuses,
        [
            ("ord-ready", OrderStatus::Ready),
            ("ord-refunded", OrderStatus::Refunded),
            ("ord-void", OrderStatus::Cancelled),
        ]
    );

    let ready_only = toast
        .get_orders(&OrderQuery {
            status: Some(OrderStatus::Ready),
            start,
            end,
            ..OrderQuery::default()
        })
        .await
        .into_result()
        .unwrap();
    assert_eq!(ready_only.len(), 1);

    let ready = toast
        .get_order(&OrderId::new("ord-ready"))
        .await
        .into_result()
        .unwrap();
    assert_eq!(ready.order_type, OrderType::DineIn);
    assert_eq!(ready.table_number.as_deref(), Some("12"));
    assert_eq!(ready.employee_id, Some(EmployeeId::new("emp-1")));
    assert_eq!(ready.tip, Decimal::ZERO);

    let missing = toast.get_order(&OrderId::new("ord-missing")).await;
    assert_eq!(missing.error_code(), Some("TOAST_ORDER_NOT_FOUND"));
}

#[tokio::test]
async fn test_refunds_surface_as_negative_transactions() {
    let (vendor, _) =
        spawn_toast(vec![ready_order(), refunded_order(), voided_order()]).await;
    let toast = toast_adapter(&vendor.base_url);
    let (start, end) = april();

    let transactions = toast
        .get_transactions(&TransactionQuery {
            start,
            end,
            ..TransactionQuery::default()
        })
        .await
        .into_result()
        .unwrap();
    assert_eq!(transactions.len(), 2);

    let refund = &transactions[0];
    assert_eq!(refund.id.as_str(), "pay-ord-refunded:refund");
    assert_eq!(refund.status, TransactionStatus::Refunded);
    assert_eq!(refund.amount, Decimal::new(-1280, 2));
    assert_eq!(refund.tip, Decimal::from(-2));
    assert_eq!(
        refund.refunded_transaction_id.as_ref().map(|id| id.as_str()),
        Some("pay-ord-refunded")
    );

    let payment = &transactions[1];
    assert_eq!(payment.status, TransactionStatus::Completed);
    assert_eq!(payment.payment_method, PaymentMethod::Card);
    assert_eq!(payment.amount, Decimal::new(1280, 2));
    assert_eq!(payment.card_last4.as_deref(), Some("4242"));

    let paged = toast
        .get_transactions(&TransactionQuery {
            start,
            end,
            limit: 1,
            offset: 1,
        })
        .await
        .into_result()
        .unwrap();
    assert_eq!(paged.len(), 1);
    assert_eq!(paged[0].id, payment.id);
}

#[tokio::test]
async fn test_sales_report_names_lines_from_menu() {
    let (vendor, _) =
        spawn_toast(vec![ready_order(), refunded_order(), voided_order()]).await;
    let toast = toast_adapter(&vendor.base_url);

    let sales = toast
        .get_sales_data(at(1, 0, 0), at(30, 23, 59), ReportPeriod::Month)
        .await
        .into_result()
        .unwrap();
    assert!(sales.total_orders > 0);
    assert!(
        sales
            .top_selling_items
            .iter()
            .all(|item| !item.name.is_empty())
    );

    let reversed = toast
        .get_sales_data(at(30, 0, 0), at(1, 0, 0), ReportPeriod::Day)
        .await;
    assert_eq!(reversed.error_code(), Some("TOAST_INVALID_REQUEST"));
}

#[tokio::test]
async fn test_sales_report_scans_every_page() {
    let (vendor, _) = spawn_toast(order_history(1100, at(30, 20, 0))).await;
    let toast = toast_adapter(&vendor.base_url);

    let sales = toast
        .get_sales_data(at(1, 0, 0), at(30, 23, 59), ReportPeriod::Month)
        .await
        .into_result()
        .unwrap();
    assert_eq!(vendor.hits("GET", "/orders/v2/ordersBulk"), 12);
    assert_eq!(sales.total_orders, 1100);
    assert_eq!(sales.total_transactions, 1100);
    assert_eq!(sales.total_revenue, Decimal::from(14_080));
    assert_eq!(sales.top_selling_items[0].quantity_sold, 1100);

    let (start, end) = april();
    let transactions = toast
        .get_transactions(&TransactionQuery {
            start,
            end,
            limit: 2000,
            offset: 0,
        })
        .await
        .into_result()
        .unwrap();
    assert_eq!(transactions.len(), 1100);
}

#[tokio::test]
async fn test_order_limit_is_exact() {
    let (vendor, _) = spawn_toast(order_history(5, at(30, 20, 0))).await;
    let toast = toast_adapter(&vendor.base_url);
    let (start, end) = april();
    let query = |limit| OrderQuery {
        start,
        end,
        limit,
        ..OrderQuery::default()
    };

    let none = toast.get_orders(&query(0)).await.into_result().unwrap();
    assert!(none.is_empty());

    let one = toast.get_orders(&query(1)).await.into_result().unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].id, OrderId::new("ord-0004"));

    let all = toast.get_orders(&query(5)).await.into_result().unwrap();
    assert_eq!(all.len(), 5);
}

// =============================================================================
// Unsupported writes and sync
// =============================================================================

#[tokio::test]
async fn test_write_operations_report_not_supported() {
    // Nothing listens here; unsupported operations never reach the network.
    let toast = toast_adapter("http://127.0.0.1:9");

    let responses = [
        toast
            .delete_menu_item(&MenuItemId::new("item-burger"))
            .await
            .error_code()
            .map(str::to_string),
        toast
            .update_inventory_level(&InventoryItemId::new("item-fries"), Decimal::from(3))
            .await
            .error_code()
            .map(str::to_string),
        toast
            .end_shift(&ShiftId::new("te-2"))
            .await
            .error_code()
            .map(str::to_string),
        toast
            .update_order_status(&OrderId::new("ord-ready"), OrderStatus::Completed)
            .await
            .error_code()
            .map(str::to_string),
        toast
            .register_webhook("https://hooks.example.com/pos", &["order.created".to_string()])
            .await
            .error_code()
            .map(str::to_string),
        toast
            .unregister_webhook(&WebhookId::new("wh-001"))
            .await
            .error_code()
            .map(str::to_string),
    ];
    assert_eq!(
        responses.map(Option::unwrap),
        [
            "TOAST_DELETE_MENU_ITEM_NOT_SUPPORTED",
            "TOAST_UPDATE_INVENTORY_LEVEL_NOT_SUPPORTED",
            "TOAST_END_SHIFT_NOT_SUPPORTED",
            "TOAST_UPDATE_ORDER_STATUS_NOT_SUPPORTED",
            "TOAST_REGISTER_WEBHOOK_NOT_SUPPORTED",
            "TOAST_UNREGISTER_WEBHOOK_NOT_SUPPORTED",
        ]
        .map(str::to_string)
    );

    let cancel = toast.cancel_order(&OrderId::new("ord-ready"), Some("guest left")).await;
    assert!(cancel.error.unwrap().is_not_supported());
}

#[tokio::test]
async fn test_sync_reports_failed_categories() {
    let fake = FakeToast::new(vec![ready_order(), refunded_order()]);
    let vendor = FakeVendor::spawn(toast_routes(fake)).await;
    let toast = toast_adapter(&vendor.base_url);

    let response = toast.sync_data().await;
    assert!(response.success, "one failed category does not fail the sync");
    let sync = response.into_result().unwrap();
    assert_eq!(sync.menu_items, 3);
    assert_eq!(sync.inventory_items, 1);
    assert_eq!(sync.employees, 0);
    assert_eq!(sync.orders, 2);
    assert_eq!(sync.failures.len(), 1);
    assert_eq!(sync.failures[0].category, "employees");
    assert_eq!(sync.failures[0].code, "TOAST_NOT_FOUND");
}
