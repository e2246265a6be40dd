//! Read-only listings: menu, orders and inventory alerts.

use pos_bridge_adapters::{Adapter, PosAdapter};
use pos_bridge_core::{OrderQuery, OrderStatus};

use super::{CommandError, emit};

/// Print menu items, optionally only the available ones.
///
/// # Errors
///
/// Returns `CommandError::Operation` if the adapter call fails.
pub async fn menu(adapter: &Adapter, available_only: bool) -> Result<(), CommandError> {
    let response = adapter.get_menu_items().await.map(|items| {
        items
            .into_iter()
            .filter(|item| !available_only || item.is_available)
            .collect::<Vec<_>>()
    });
    emit(&response)
}

/// Print up to `limit` orders, optionally filtered by status.
///
/// # Errors
///
/// Returns `CommandError` for a zero limit or a failed adapter call.
pub async fn orders(
    adapter: &Adapter,
    status: Option<OrderStatus>,
    limit: usize,
) -> Result<(), CommandError> {
    if limit == 0 {
        return Err(CommandError::InvalidArgument(
            "--limit must be at least 1".to_string(),
        ));
    }
    let query = OrderQuery {
        status,
        limit,
        ..OrderQuery::default()
    };
    emit(&adapter.get_orders(&query).await)
}

/// Print inventory items at or below their alert level.
///
/// # Errors
///
/// Returns `CommandError::Operation` if the adapter call fails.
pub async fn inventory_alerts(adapter: &Adapter) -> Result<(), CommandError> {
    let response = adapter.get_inventory_alerts().await;
    if let Some(items) = response.data() {
        tracing::info!(count = items.len(), "Inventory alerts");
    }
    emit(&response)
}
