//! Square REST wire types.
//!
//! Only the fields the adapter reads or writes are modeled. Unknown fields
//! are ignored on input and `None` fields are omitted on output, so partial
//! objects can be sent back to Square for versioned updates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Amount in the currency's smallest unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: i64,
    pub currency: String,
}

/// One entry of Square's `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct SquareApiError {
    pub category: String,
    pub code: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<SquareApiError>,
}

// =============================================================================
// Locations
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListLocationsResponse {
    #[serde(default)]
    pub locations: Vec<Location>,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_at_all_locations: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_data: Option<CatalogItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_variation_data: Option<CatalogItemVariation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_data: Option<CatalogCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier_list_data: Option<CatalogModifierList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier_data: Option<CatalogModifier>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<CatalogObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifier_list_info: Vec<ModifierListInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogItemVariation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_inventory: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_alert_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_alert_threshold: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogCategory {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogModifierList {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub selection_type: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<CatalogObject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogModifier {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price_money: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifierListInfo {
    pub modifier_list_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_selected_modifiers: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selected_modifiers: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListCatalogResponse {
    #[serde(default)]
    pub objects: Vec<CatalogObject>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RetrieveCatalogObjectResponse {
    pub object: CatalogObject,
    #[serde(default)]
    pub related_objects: Vec<CatalogObject>,
}

#[derive(Debug, Serialize)]
pub struct UpsertCatalogObjectRequest {
    pub idempotency_key: String,
    pub object: CatalogObject,
}

#[derive(Debug, Deserialize)]
pub struct UpsertCatalogObjectResponse {
    pub catalog_object: CatalogObject,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCatalogObjectResponse {
    #[serde(default)]
    pub deleted_object_ids: Vec<String>,
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Serialize)]
pub struct BatchRetrieveInventoryCountsRequest {
    pub location_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_object_ids: Option<Vec<String>>,
    pub states: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRetrieveInventoryCountsResponse {
    #[serde(default)]
    pub counts: Vec<InventoryCount>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryCount {
    pub catalog_object_id: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
    /// Decimal string.
    pub quantity: String,
    #[serde(default)]
    pub calculated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct BatchChangeInventoryRequest {
    pub idempotency_key: String,
    pub changes: Vec<InventoryChange>,
    pub ignore_unchanged_counts: bool,
}

#[derive(Debug, Serialize)]
pub struct InventoryChange {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub physical_count: InventoryPhysicalCount,
}

#[derive(Debug, Serialize)]
pub struct InventoryPhysicalCount {
    pub catalog_object_id: String,
    pub state: &'static str,
    pub location_id: String,
    pub quantity: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct BatchChangeInventoryResponse {
    #[serde(default)]
    pub counts: Vec<InventoryCount>,
}

// =============================================================================
// Team and labor
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TeamMember {
    pub id: String,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SearchTeamMembersRequest {
    pub query: TeamMemberQuery,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TeamMemberQuery {
    pub filter: TeamMemberFilter,
}

#[derive(Debug, Serialize)]
pub struct TeamMemberFilter {
    pub location_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchTeamMembersResponse {
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RetrieveTeamMemberResponse {
    pub team_member: TeamMember,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamMemberWage {
    #[serde(default)]
    pub team_member_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub hourly_rate: Option<Money>,
}

#[derive(Debug, Deserialize)]
pub struct ListTeamMemberWagesResponse {
    #[serde(default)]
    pub team_member_wages: Vec<TeamMemberWage>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaborShift {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub location_id: String,
    pub team_member_id: String,
    pub start_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wage: Option<ShiftWage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breaks: Vec<ShiftBreak>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftWage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftBreak {
    pub start_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_paid: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchShiftsRequest {
    pub query: ShiftSearchQuery,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShiftSearchQuery {
    pub filter: ShiftFilter,
    pub sort: SortSpec,
}

#[derive(Debug, Default, Serialize)]
pub struct ShiftFilter {
    pub location_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_member_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<TimeRange>,
}

#[derive(Debug, Deserialize)]
pub struct SearchShiftsResponse {
    #[serde(default)]
    pub shifts: Vec<LaborShift>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateShiftRequest {
    pub idempotency_key: String,
    pub shift: LaborShift,
}

#[derive(Debug, Serialize)]
pub struct UpdateShiftRequest {
    pub shift: LaborShift,
}

#[derive(Debug, Deserialize)]
pub struct ShiftResponse {
    pub shift: LaborShift,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SquareOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<OrderLineItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fulfillments: Vec<Fulfillment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refunds: Vec<OrderRefund>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tax_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_discount_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tip_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderLineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Decimal string.
    pub quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_sales_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<OrderLineItemModifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderLineItemModifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price_money: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price_money: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fulfillment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_details: Option<PickupDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickupDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Recipient>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderRefund {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount_money: Option<Money>,
}

#[derive(Debug, Serialize)]
pub struct SearchOrdersRequest {
    pub location_ids: Vec<String>,
    pub query: OrderSearchQuery,
    pub limit: u32,
    pub return_entries: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderSearchQuery {
    pub filter: OrderSearchFilter,
    pub sort: OrderSearchSort,
}

#[derive(Debug, Default, Serialize)]
pub struct OrderSearchFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_filter: Option<StateFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time_filter: Option<DateTimeFilter>,
}

#[derive(Debug, Serialize)]
pub struct StateFilter {
    pub states: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DateTimeFilter {
    pub created_at: TimeRange,
}

#[derive(Debug, Serialize)]
pub struct OrderSearchSort {
    pub sort_field: &'static str,
    pub sort_order: &'static str,
}

#[derive(Debug, Default, Serialize)]
pub struct TimeRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SortSpec {
    pub field: &'static str,
    pub order: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SearchOrdersResponse {
    #[serde(default)]
    pub orders: Vec<SquareOrder>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub order: SquareOrder,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    pub idempotency_key: String,
    pub order: SquareOrder,
}

#[derive(Debug, Serialize)]
pub struct UpdateOrderRequest {
    pub idempotency_key: String,
    pub order: SquareOrder,
}

// =============================================================================
// Payments and refunds
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    pub id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub amount_money: Option<Money>,
    #[serde(default)]
    pub tip_money: Option<Money>,
    #[serde(default)]
    pub total_money: Option<Money>,
    #[serde(default)]
    pub refunded_money: Option<Money>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub card_details: Option<CardPaymentDetails>,
    #[serde(default)]
    pub receipt_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardPaymentDetails {
    #[serde(default)]
    pub card: Option<Card>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub card_brand: Option<String>,
    #[serde(default)]
    pub last_4: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListPaymentsResponse {
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentResponse {
    pub payment: Payment,
}

#[derive(Debug, Serialize)]
pub struct CreatePaymentRequest {
    pub idempotency_key: String,
    pub source_id: &'static str,
    pub amount_money: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip_money: Option<Money>,
    pub order_id: String,
    pub location_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_details: Option<CashDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_details: Option<ExternalDetails>,
}

#[derive(Debug, Serialize)]
pub struct CashDetails {
    pub buyer_supplied_money: Money,
}

#[derive(Debug, Serialize)]
pub struct ExternalDetails {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub source: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRefund {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount_money: Option<Money>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListRefundsResponse {
    #[serde(default)]
    pub refunds: Vec<PaymentRefund>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefundPaymentRequest {
    pub idempotency_key: String,
    pub payment_id: String,
    pub amount_money: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefundResponse {
    pub refund: PaymentRefund,
}

// =============================================================================
// Webhooks
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSubscription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub event_types: Vec<String>,
    pub notification_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct CreateWebhookSubscriptionRequest {
    pub idempotency_key: String,
    pub subscription: WebhookSubscription,
}

#[derive(Debug, Deserialize)]
pub struct WebhookSubscriptionResponse {
    pub subscription: WebhookSubscription,
}
