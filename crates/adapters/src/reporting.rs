//! Sales aggregation shared by every adapter.
//!
//! Vendors only expose raw orders and payments, so reports are computed
//! locally from records that the caller has already filtered to the range.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Timelike, Utc};
use pos_bridge_core::{
    CurrencyCode, HourlySales, MenuItemId, Order, OrderStatus, PaymentMethod,
    PaymentMethodBreakdown, ReportPeriod, SalesData, TopSellingItem, Transaction, round_money,
};
use rust_decimal::Decimal;

/// Entries kept in [`SalesData::top_selling_items`].
pub const TOP_SELLING_LIMIT: usize = 10;

/// Build a sales report.
///
/// Revenue counts settled transactions only (completed payments and
/// refunds, the latter negative). Cancelled orders do not contribute to
/// item rankings.
#[must_use]
pub fn aggregate_sales(
    period: ReportPeriod,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    orders: &[Order],
    transactions: &[Transaction],
) -> SalesData {
    let settled: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.status.is_settled())
        .collect();

    let total_revenue = round_money(settled.iter().map(|t| t.amount).sum(), CurrencyCode::USD);
    let average_order_value = if orders.is_empty() {
        Decimal::ZERO
    } else {
        round_money(
            total_revenue / Decimal::from(orders.len()),
            CurrencyCode::USD,
        )
    };

    let hourly_breakdown = period
        .includes_hourly_breakdown()
        .then(|| hourly_breakdown(&settled));

    SalesData {
        period,
        start_date: start,
        end_date: end,
        total_revenue,
        total_transactions: settled.len(),
        total_orders: orders.len(),
        average_order_value,
        top_selling_items: top_selling_items(orders),
        payment_methods: payment_breakdown(&settled),
        hourly_breakdown,
    }
}

fn top_selling_items(orders: &[Order]) -> Vec<TopSellingItem> {
    let mut by_item: HashMap<&MenuItemId, TopSellingItem> = HashMap::new();

    for item in orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .flat_map(|o| &o.items)
    {
        let entry = by_item
            .entry(&item.menu_item_id)
            .or_insert_with(|| TopSellingItem {
                menu_item_id: item.menu_item_id.clone(),
                name: item.name.clone(),
                quantity_sold: 0,
                revenue: Decimal::ZERO,
            });
        entry.quantity_sold += u64::from(item.quantity);
        entry.revenue += item.total_price;
    }

    let mut ranked: Vec<TopSellingItem> = by_item.into_values().collect();
    ranked.sort_by(|a, b| {
        b.quantity_sold
            .cmp(&a.quantity_sold)
            .then_with(|| b.revenue.cmp(&a.revenue))
            .then_with(|| a.menu_item_id.cmp(&b.menu_item_id))
    });
    ranked.truncate(TOP_SELLING_LIMIT);
    ranked
}

fn payment_breakdown(settled: &[&Transaction]) -> Vec<PaymentMethodBreakdown> {
    let mut by_method: BTreeMap<PaymentMethod, (usize, Decimal)> = BTreeMap::new();
    for txn in settled {
        let entry = by_method.entry(txn.payment_method).or_default();
        entry.0 += 1;
        entry.1 += txn.amount;
    }

    by_method
        .into_iter()
        .map(|(method, (count, total))| PaymentMethodBreakdown {
            method,
            count,
            total: round_money(total, CurrencyCode::USD),
        })
        .collect()
}

fn hourly_breakdown(settled: &[&Transaction]) -> Vec<HourlySales> {
    let mut by_hour: BTreeMap<u32, (Decimal, usize)> = BTreeMap::new();
    for txn in settled {
        let entry = by_hour.entry(txn.processed_at.hour()).or_default();
        entry.0 += txn.amount;
        entry.1 += 1;
    }

    by_hour
        .into_iter()
        .map(|(hour, (revenue, transactions))| HourlySales {
            hour,
            revenue: round_money(revenue, CurrencyCode::USD),
            transactions,
        })
        .collect()
}
