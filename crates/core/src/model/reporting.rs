//! Sales reporting records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MenuItemId, PaymentMethod, ReportPeriod};

/// Aggregate sales over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesData {
    pub period: ReportPeriod,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Net of refunds.
    pub total_revenue: Decimal,
    pub total_transactions: usize,
    pub total_orders: usize,
    /// `total_revenue / total_orders`, zero when there are no orders.
    pub average_order_value: Decimal,
    /// Ranked by quantity sold, at most ten entries.
    pub top_selling_items: Vec<TopSellingItem>,
    pub payment_methods: Vec<PaymentMethodBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_breakdown: Option<Vec<HourlySales>>,
}

/// A best-selling menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingItem {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub quantity_sold: u64,
    pub revenue: Decimal,
}

/// Revenue attributed to one payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodBreakdown {
    pub method: PaymentMethod,
    pub count: usize,
    pub total: Decimal,
}

/// Revenue within one hour of the day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySales {
    pub hour: u32,
    pub revenue: Decimal,
    pub transactions: usize,
}
