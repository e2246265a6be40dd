//! Contract walk-through against the mock adapter.
//!
//! Every canonical operation is exercised end to end through the result
//! envelope, the way an application would drive a real vendor.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::Duration;
use futures::future::join_all;
use pos_bridge_adapters::{AdapterFactory, MockAdapter, MockOptions, PosAdapter};
use pos_bridge_core::{
    CustomerInfo, EmployeeId, Environment, InventoryItemId, MenuItemId, MenuItemUpdate,
    NewMenuItem, NewOrder, NewOrderItem, OrderId, OrderQuery, OrderStatus, OrderType,
    PaymentMethod, PaymentRequest, PosProvider, ReportPeriod, ShiftQuery, ShiftStatus,
    TransactionQuery, TransactionStatus,
};
use pos_bridge_integration_tests::{mock_adapter, mock_anchor};
use rust_decimal::Decimal;

fn burger_order(quantity: u32) -> NewOrder {
    NewOrder {
        items: vec![NewOrderItem {
            menu_item_id: MenuItemId::new("item-001"),
            name: "Classic Burger".to_string(),
            quantity,
            unit_price: Decimal::new(1299, 2),
            modifiers: Vec::new(),
            special_instructions: None,
        }],
        order_type: OrderType::Takeout,
        customer: Some(CustomerInfo {
            name: Some("Sam Rivera".to_string()),
            ..CustomerInfo::default()
        }),
        ..NewOrder::default()
    }
}

fn payment(order_id: &OrderId, amount: Decimal) -> PaymentRequest {
    PaymentRequest {
        order_id: order_id.clone(),
        amount,
        method: PaymentMethod::Card,
        tip: Some(Decimal::new(200, 2)),
        customer: None,
    }
}

// =============================================================================
// Connection
// =============================================================================

#[tokio::test]
async fn test_connection_lifecycle() {
    let mock = mock_adapter();

    let initial = mock.get_connection_status().await.into_result().unwrap();
    assert!(!initial.is_connected);
    assert!(initial.last_connection_attempt.is_none());

    let connected = mock.connect().await;
    assert!(connected.success);
    let metadata = connected.metadata.as_ref().unwrap();
    assert_eq!(metadata.provider, PosProvider::Mock);
    assert!(connected.data.as_ref().unwrap().is_connected);

    let probe = mock.test_connection().await.into_result().unwrap();
    assert!(probe.latency_ms < 1_000);

    let disconnected = mock.disconnect().await.into_result().unwrap();
    assert!(!disconnected.is_connected);
    assert!(disconnected.last_successful_connection.is_some());
}

#[tokio::test]
async fn test_concurrent_connects_share_one_handshake() {
    let mock = mock_adapter();
    let results = join_all((0..8).map(|_| mock.connect())).await;

    let stamps: Vec<_> = results
        .into_iter()
        .map(|r| r.into_result().unwrap().last_successful_connection)
        .collect();
    assert!(stamps.iter().all(|s| s.is_some() && *s == stamps[0]));
}

#[tokio::test]
async fn test_every_envelope_carries_a_fresh_request_id() {
    let mock = mock_adapter();
    let first = mock.get_menu_items().await;
    let second = mock.get_menu_items().await;
    assert_ne!(
        first.metadata.unwrap().request_id,
        second.metadata.unwrap().request_id
    );
}

// =============================================================================
// Menu
// =============================================================================

#[tokio::test]
async fn test_menu_item_crud() {
    let mock = mock_adapter();
    assert_eq!(mock.get_menu_items().await.into_result().unwrap().len(), 12);

    let created = mock
        .create_menu_item(&NewMenuItem {
            name: "Milkshake".to_string(),
            description: Some("Vanilla bean".to_string()),
            price: Decimal::new(650, 2),
            category: "Drinks".to_string(),
            is_available: true,
            sku: Some("SHAKE-1".to_string()),
            preparation_time: Some(4),
            allergens: vec!["dairy".to_string()],
        })
        .await
        .into_result()
        .unwrap();
    assert_eq!(created.id.as_str(), "item-013");

    let fetched = mock.get_menu_item(&created.id).await.into_result().unwrap();
    assert_eq!(fetched, created);

    let updated = mock
        .update_menu_item(
            &created.id,
            &MenuItemUpdate {
                price: Some(Decimal::new(700, 2)),
                ..MenuItemUpdate::default()
            },
        )
        .await
        .into_result()
        .unwrap();
    assert_eq!(updated.price, Decimal::new(700, 2));
    assert_eq!(updated.name, "Milkshake");

    let hidden = mock
        .update_menu_item_availability(&created.id, false)
        .await
        .into_result()
        .unwrap();
    assert!(!hidden.is_available);

    assert!(mock.delete_menu_item(&created.id).await.success);
    let gone = mock.get_menu_item(&created.id).await;
    assert_eq!(gone.error_code(), Some("MOCK_MENU_ITEM_NOT_FOUND"));
}

#[tokio::test]
async fn test_blank_menu_item_is_rejected() {
    let mock = mock_adapter();
    let response = mock
        .create_menu_item(&NewMenuItem {
            name: "   ".to_string(),
            description: None,
            price: Decimal::ONE,
            category: "Sides".to_string(),
            is_available: true,
            sku: None,
            preparation_time: None,
            allergens: Vec::new(),
        })
        .await;
    assert_eq!(response.error_code(), Some("MOCK_INVALID_REQUEST"));
}

// =============================================================================
// Inventory
// =============================================================================

#[tokio::test]
async fn test_inventory_alerts_follow_stock_levels() {
    let mock = mock_adapter();

    let alerts = mock.get_inventory_alerts().await.into_result().unwrap();
    assert!(alerts.iter().all(pos_bridge_core::InventoryItem::is_in_alert));
    let names: Vec<&str> = alerts.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        ["Cheddar Cheese", "Salmon Fillets", "Yellow Onions", "Craft Beer Kegs"]
    );

    let cheddar = InventoryItemId::new("inv-003");
    let restocked = mock
        .update_inventory_level(&cheddar, Decimal::from(30))
        .await
        .into_result()
        .unwrap();
    assert!(!restocked.is_in_alert());

    let alerts = mock.get_inventory_alerts().await.into_result().unwrap();
    assert_eq!(alerts.len(), 3);
    assert!(alerts.iter().all(|i| i.id != cheddar));
}

#[tokio::test]
async fn test_negative_stock_is_rejected() {
    let mock = mock_adapter();
    let response = mock
        .update_inventory_level(&InventoryItemId::new("inv-001"), Decimal::NEGATIVE_ONE)
        .await;
    assert_eq!(response.error_code(), Some("MOCK_INVALID_REQUEST"));

    let unchanged = mock
        .get_inventory_item(&InventoryItemId::new("inv-001"))
        .await
        .into_result()
        .unwrap();
    assert_eq!(unchanged.current_stock, Decimal::from(45));
}

// =============================================================================
// Labor
// =============================================================================

#[tokio::test]
async fn test_shift_lifecycle() {
    let mock = mock_adapter();
    let server = EmployeeId::new("emp-002");

    let shift = mock.start_shift(&server).await.into_result().unwrap();
    assert_eq!(shift.status, ShiftStatus::Active);
    assert!(shift.end_time.is_none());

    let again = mock.start_shift(&server).await;
    assert_eq!(again.error_code(), Some("MOCK_SHIFT_ALREADY_ACTIVE"));

    let ended = mock.end_shift(&shift.id).await.into_result().unwrap();
    assert_eq!(ended.status, ShiftStatus::Completed);
    assert!(ended.end_time.is_some());
    assert!(ended.hours_worked.is_some());

    let twice = mock.end_shift(&shift.id).await;
    assert_eq!(twice.error_code(), Some("MOCK_SHIFT_NOT_ACTIVE"));

    let shifts = mock
        .get_employee_shifts(&ShiftQuery {
            employee_id: Some(server.clone()),
            ..ShiftQuery::default()
        })
        .await
        .into_result()
        .unwrap();
    assert!(shifts.iter().all(|s| s.employee_id == server));
    assert!(shifts.iter().any(|s| s.id == shift.id));
}

#[tokio::test]
async fn test_inactive_employee_cannot_clock_in() {
    let mock = mock_adapter();
    let host = mock
        .get_employee(&EmployeeId::new("emp-006"))
        .await
        .into_result()
        .unwrap();
    assert!(!host.is_active);

    let response = mock.start_shift(&host.id).await;
    assert_eq!(response.error_code(), Some("MOCK_EMPLOYEE_INACTIVE"));
}

// =============================================================================
// Orders and payments
// =============================================================================

#[tokio::test]
async fn test_order_status_progression() {
    let mock = mock_adapter();

    let order = mock.create_order(&burger_order(2)).await.into_result().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.subtotal, Decimal::new(2598, 2));
    assert!(order.reconcile(Decimal::new(1, 2)).is_empty());

    let newest = mock
        .get_orders(&OrderQuery {
            limit: 1,
            ..OrderQuery::default()
        })
        .await
        .into_result()
        .unwrap();
    assert_eq!(newest[0].id, order.id);

    for status in [OrderStatus::Preparing, OrderStatus::Ready, OrderStatus::Completed] {
        let updated = mock
            .update_order_status(&order.id, status)
            .await
            .into_result()
            .unwrap();
        assert_eq!(updated.status, status);
    }

    let completed = mock.get_order(&order.id).await.into_result().unwrap();
    assert!(completed.completed_at.is_some());

    let cancel = mock.cancel_order(&order.id, Some("changed mind")).await;
    assert_eq!(cancel.error_code(), Some("MOCK_ORDER_NOT_CANCELLABLE"));
}

#[tokio::test]
async fn test_cancelled_order_cannot_be_paid() {
    let mock = mock_adapter();
    let order = mock.create_order(&burger_order(1)).await.into_result().unwrap();

    let cancelled = mock
        .cancel_order(&order.id, Some("kitchen closed"))
        .await
        .into_result()
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(cancelled.notes.unwrap().contains("kitchen closed"));

    let response = mock.process_payment(&payment(&order.id, order.total)).await;
    assert_eq!(response.error_code(), Some("MOCK_ORDER_NOT_PAYABLE"));
}

#[tokio::test]
async fn test_payment_and_refunds() {
    let mock = mock_adapter();
    let order = mock.create_order(&burger_order(1)).await.into_result().unwrap();

    let result = mock
        .process_payment(&payment(&order.id, order.total))
        .await
        .into_result()
        .unwrap();
    assert!(result.success);
    let charge = result.transaction.unwrap();
    assert_eq!(charge.status, TransactionStatus::Completed);
    assert_eq!(charge.amount, order.total);

    let partial = mock
        .refund_transaction(&charge.id, Some(Decimal::from(5)), Some("cold fries"))
        .await
        .into_result()
        .unwrap();
    assert_eq!(partial.amount, Decimal::from(-5));
    assert_eq!(partial.refunded_transaction_id.as_ref(), Some(&charge.id));
    assert_eq!(partial.refund_reason.as_deref(), Some("cold fries"));

    let rest = mock
        .refund_transaction(&charge.id, None, None)
        .await
        .into_result()
        .unwrap();
    assert_eq!(rest.amount, -(charge.amount - Decimal::from(5)));

    let over = mock
        .refund_transaction(&charge.id, Some(Decimal::ONE), None)
        .await;
    assert_eq!(over.error_code(), Some("MOCK_REFUND_EXCEEDS_BALANCE"));

    let refund_of_refund = mock.refund_transaction(&partial.id, None, None).await;
    assert_eq!(
        refund_of_refund.error_code(),
        Some("MOCK_TRANSACTION_NOT_REFUNDABLE")
    );
}

#[tokio::test]
async fn test_transaction_pages_do_not_overlap() {
    let mock = mock_adapter();
    let page = |offset| TransactionQuery {
        limit: 5,
        offset,
        ..TransactionQuery::default()
    };

    let first = mock.get_transactions(&page(0)).await.into_result().unwrap();
    let second = mock.get_transactions(&page(5)).await.into_result().unwrap();
    assert_eq!(first.len(), 5);
    assert!(first.windows(2).all(|w| w[0].processed_at >= w[1].processed_at));
    assert!(second.iter().all(|t| first.iter().all(|f| f.id != t.id)));
    assert!(first[4].processed_at >= second[0].processed_at);
}

// =============================================================================
// Reporting and sync
// =============================================================================

#[tokio::test]
async fn test_sales_report_is_consistent() {
    let mock = mock_adapter();
    let end = mock_anchor();
    let start = end - Duration::days(30);

    let sales = mock
        .get_sales_data(start, end, ReportPeriod::Day)
        .await
        .into_result()
        .unwrap();
    assert!(sales.total_orders > 0);
    assert!(sales.top_selling_items.len() <= 10);
    assert_eq!(
        sales.payment_methods.iter().map(|m| m.count).sum::<usize>(),
        sales.total_transactions
    );
    assert_eq!(
        sales.payment_methods.iter().map(|m| m.total).sum::<Decimal>(),
        sales.total_revenue
    );
    assert!(sales.hourly_breakdown.is_some());

    let monthly = mock
        .get_sales_data(start, end, ReportPeriod::Month)
        .await
        .into_result()
        .unwrap();
    assert!(monthly.hourly_breakdown.is_none());
    assert_eq!(monthly.total_revenue, sales.total_revenue);
}

#[tokio::test]
async fn test_sync_counts_every_category() {
    let adapter = AdapterFactory::new()
        .with_mock_options(MockOptions::instant())
        .builder()
        .provider(PosProvider::Mock)
        .environment(Environment::Sandbox)
        .create_adapter()
        .unwrap();

    let sync = adapter.sync_data().await.into_result().unwrap();
    assert_eq!(sync.menu_items, 12);
    assert_eq!(sync.inventory_items, 10);
    assert_eq!(sync.employees, 6);
    assert!(sync.orders > 0);
    assert!(sync.transactions > 0);
    assert!(sync.failures.is_empty());
}

// =============================================================================
// Webhooks
// =============================================================================

#[tokio::test]
async fn test_webhook_registration_is_validated() {
    let mock = mock_adapter();
    let events = vec!["order.created".to_string()];

    let bad_url = mock.register_webhook("ftp://hooks.example.com", &events).await;
    assert_eq!(bad_url.error_code(), Some("MOCK_INVALID_REQUEST"));

    let no_events = mock
        .register_webhook("https://hooks.example.com/pos", &[])
        .await;
    assert_eq!(no_events.error_code(), Some("MOCK_INVALID_REQUEST"));

    let registration = mock
        .register_webhook("https://hooks.example.com/pos", &events)
        .await
        .into_result()
        .unwrap();
    assert_eq!(registration.events, events);
}

// =============================================================================
// Failure injection
// =============================================================================

#[tokio::test]
async fn test_forced_failures_surface_as_declines() {
    let mock = MockAdapter::new(MockOptions::instant().with_failure_rate(1.0), mock_anchor());

    let probe = mock.test_connection().await;
    assert_eq!(probe.error_code(), Some("MOCK_CONNECTION_FAILED"));

    let order = mock.create_order(&burger_order(1)).await.into_result().unwrap();
    let result = mock
        .process_payment(&payment(&order.id, order.total))
        .await
        .into_result()
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.decline_code.as_deref(), Some("GENERIC_DECLINE"));

    let failed = result.transaction.unwrap();
    assert_eq!(failed.status, TransactionStatus::Failed);
    let refund = mock.refund_transaction(&failed.id, None, None).await;
    assert_eq!(refund.error_code(), Some("MOCK_TRANSACTION_NOT_REFUNDABLE"));
}

#[tokio::test]
async fn test_same_seed_generates_same_history() {
    let a = MockAdapter::new(MockOptions::instant().with_seed(7), mock_anchor());
    let b = MockAdapter::new(MockOptions::instant().with_seed(7), mock_anchor());

    let query = OrderQuery::default();
    let left = a.get_orders(&query).await.into_result().unwrap();
    let right = b.get_orders(&query).await.into_result().unwrap();
    assert_eq!(left, right);
}
