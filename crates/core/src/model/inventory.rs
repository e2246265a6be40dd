//! Inventory records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::InventoryItemId;

/// A stock-tracked ingredient or product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub current_stock: Decimal,
    /// Unit of measure ("each", "lb", "gal").
    pub unit: String,
    pub minimum_stock: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_stock: Option<Decimal>,
    /// Overrides `minimum_stock` as the alert level when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_threshold: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_unit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
    /// Stock level at or below which the item is in alert.
    #[must_use]
    pub fn alert_level(&self) -> Decimal {
        self.alert_threshold.unwrap_or(self.minimum_stock)
    }

    /// `current_stock <= (alert_threshold ?? minimum_stock)`.
    #[must_use]
    pub fn is_in_alert(&self) -> bool {
        self.current_stock <= self.alert_level()
    }
}
