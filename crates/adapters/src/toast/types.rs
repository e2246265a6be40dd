//! Toast REST wire types.
//!
//! Toast sends money as JSON numbers in major units, so amounts are `f64`
//! here and converted to `Decimal` at the mapping boundary.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to another Toast entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidRef {
    pub guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
}

impl GuidRef {
    #[must_use]
    pub fn new(guid: impl Into<String>, entity_type: &str) -> Self {
        Self {
            guid: guid.into(),
            entity_type: Some(entity_type.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub general: Option<RestaurantGeneral>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantGeneral {
    #[serde(default)]
    pub name: Option<String>,
}

// =============================================================================
// Menus
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenusResponse {
    #[serde(default)]
    pub menus: Vec<Menu>,
    #[serde(default)]
    pub modifier_group_references: HashMap<String, ModifierGroup>,
    #[serde(default)]
    pub modifier_option_references: HashMap<String, ModifierOptionRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub guid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub menu_groups: Vec<MenuGroup>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuGroup {
    pub guid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub menu_items: Vec<ToastMenuItem>,
    #[serde(default)]
    pub menu_groups: Vec<MenuGroup>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastMenuItem {
    pub guid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub modifier_group_references: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierGroup {
    pub guid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub min_selections: Option<u32>,
    #[serde(default)]
    pub max_selections: Option<u32>,
    #[serde(default)]
    pub modifier_option_references: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierOptionRef {
    pub guid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

// =============================================================================
// Stock
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    /// Menu item GUID.
    pub guid: String,
    pub status: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub version_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub guid: String,
    pub status: &'static str,
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

// =============================================================================
// Labor
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastEmployee {
    pub guid: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub job_references: Vec<GuidRef>,
    #[serde(default)]
    pub wage_overrides: Vec<WageOverride>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WageOverride {
    pub job_reference: GuidRef,
    pub wage: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub guid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub default_wage: Option<f64>,
    #[serde(default)]
    pub wage_frequency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub guid: String,
    pub employee_reference: GuidRef,
    #[serde(default)]
    pub job_reference: Option<GuidRef>,
    pub in_date: DateTime<Utc>,
    #[serde(default)]
    pub out_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub breaks: Vec<TimeEntryBreak>,
    #[serde(default)]
    pub hourly_wage: Option<f64>,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryBreak {
    pub in_date: DateTime<Utc>,
    #[serde(default)]
    pub out_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paid: bool,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastOrder {
    pub guid: String,
    #[serde(default)]
    pub display_number: Option<String>,
    #[serde(default)]
    pub approval_status: Option<String>,
    #[serde(default)]
    pub dining_option: Option<DiningOption>,
    #[serde(default)]
    pub checks: Vec<Check>,
    #[serde(default)]
    pub server: Option<GuidRef>,
    #[serde(default)]
    pub table: Option<TableRef>,
    #[serde(default)]
    pub voided: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub opened_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningOption {
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub behavior: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRef {
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Check {
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub tax_amount: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub customer: Option<CheckCustomer>,
    #[serde(default)]
    pub selections: Vec<Selection>,
    #[serde(default)]
    pub payments: Vec<CheckPayment>,
    #[serde(default)]
    pub applied_discounts: Vec<AppliedDiscount>,
    #[serde(default)]
    pub voided: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckCustomer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub item: Option<GuidRef>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub pre_discount_price: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<Selection>,
    #[serde(default)]
    pub special_request: Option<String>,
    #[serde(default)]
    pub voided: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    #[serde(default)]
    pub discount_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPayment {
    pub guid: String,
    #[serde(default)]
    pub paid_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub tip_amount: Option<f64>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub refund_status: Option<String>,
    #[serde(default)]
    pub refund: Option<PaymentRefund>,
    #[serde(default)]
    pub last4_digits: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRefund {
    #[serde(default)]
    pub refund_amount: Option<f64>,
    #[serde(default)]
    pub tip_refund_amount: Option<f64>,
    #[serde(default)]
    pub refund_date: Option<DateTime<Utc>>,
}

// =============================================================================
// Order creation
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dining_option: Option<GuidRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<GuidRef>,
    pub checks: Vec<CreateCheck>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheck {
    pub selections: Vec<CreateSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CheckCustomer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSelection {
    pub item: GuidRef,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_price_amount: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<CreateSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_request: Option<String>,
}
