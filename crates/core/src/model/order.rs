//! Order records.
//!
//! Vendors report `subtotal`, `tax`, `tip` and `total` independently and may
//! round each one on its own. Adapters pass them through untouched;
//! [`Order::reconcile`] reports where they disagree with the line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{EmployeeId, MenuItemId, ModifierId, OrderId, OrderItemId, OrderStatus, OrderType};

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Human-facing ticket number.
    pub order_number: String,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub tip: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A line on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// Vendor-reported line total. Expected, not guaranteed, to equal
    /// [`OrderItem::expected_total`].
    pub total_price: Decimal,
    #[serde(default)]
    pub modifiers: Vec<OrderModifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl OrderItem {
    /// `unit_price * quantity + sum(modifier prices)`.
    #[must_use]
    pub fn expected_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
            + self.modifiers.iter().map(|m| m.price).sum::<Decimal>()
    }
}

/// A modifier applied to an order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderModifier {
    pub id: ModifierId,
    pub name: String,
    pub price: Decimal,
}

/// Customer contact details attached to an order or payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Which reported amount disagrees with the computed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalsField {
    /// A line's `total_price` versus its expected total.
    LineItem,
    /// `subtotal` versus the sum of line totals.
    Subtotal,
    /// `total` versus `subtotal + tax + tip - discount`.
    Total,
}

/// A reported amount that differs from the computed amount by more than the
/// tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsDiscrepancy {
    pub field: TotalsField,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_item_id: Option<OrderItemId>,
    pub reported: Decimal,
    pub computed: Decimal,
}

impl Order {
    /// Sum of vendor-reported line totals.
    #[must_use]
    pub fn line_items_total(&self) -> Decimal {
        self.items.iter().map(|item| item.total_price).sum()
    }

    /// Compare reported amounts against the amounts implied by the lines.
    ///
    /// Differences within `tolerance` are ignored. An empty result means the
    /// order is internally consistent.
    #[must_use]
    pub fn reconcile(&self, tolerance: Decimal) -> Vec<TotalsDiscrepancy> {
        let mut discrepancies = Vec::new();
        let differs = |a: Decimal, b: Decimal| (a - b).abs() > tolerance;

        for item in &self.items {
            let computed = item.expected_total();
            if differs(item.total_price, computed) {
                discrepancies.push(TotalsDiscrepancy {
                    field: TotalsField::LineItem,
                    line_item_id: Some(item.id.clone()),
                    reported: item.total_price,
                    computed,
                });
            }
        }

        let lines = self.line_items_total();
        if differs(self.subtotal, lines) {
            discrepancies.push(TotalsDiscrepancy {
                field: TotalsField::Subtotal,
                line_item_id: None,
                reported: self.subtotal,
                computed: lines,
            });
        }

        let computed_total = self.subtotal + self.tax + self.tip - self.discount;
        if differs(self.total, computed_total) {
            discrepancies.push(TotalsDiscrepancy {
                field: TotalsField::Total,
                line_item_id: None,
                reported: self.total,
                computed: computed_total,
            });
        }

        discrepancies
    }
}

/// Input for creating an order.
///
/// Omitted totals are computed by the adapter; supplied totals are passed
/// through as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<NewOrderItem>,
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub customer: Option<CustomerInfo>,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub tax: Option<Decimal>,
    #[serde(default)]
    pub tip: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
}

/// A line on a [`NewOrder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub modifiers: Vec<NewOrderModifier>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

impl NewOrderItem {
    /// `unit_price * quantity + sum(modifier prices)`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
            + self.modifiers.iter().map(|m| m.price).sum::<Decimal>()
    }
}

/// A modifier on a [`NewOrderItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderModifier {
    #[serde(default)]
    pub id: Option<ModifierId>,
    pub name: String,
    pub price: Decimal,
}
