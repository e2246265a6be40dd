//! Square wire types to canonical records and back.

use std::collections::HashMap;

use chrono::Utc;
use pos_bridge_core::{
    CurrencyCode, CustomerInfo, Employee, EmployeeId, InventoryItem, InventoryItemId, MenuItem,
    MenuItemId, MenuItemUpdate, Modifier, ModifierId, ModifierOption, NewMenuItem, NewOrder,
    Order, OrderId, OrderItem, OrderItemId, OrderModifier, OrderStatus, OrderType, PaymentMethod,
    Shift, ShiftId, Transaction, TransactionId, TransactionStatus, from_minor_units,
    to_minor_units,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::mapping;
use super::types::{
    CatalogItem, CatalogItemVariation, CatalogObject, Fulfillment, InventoryCount, LaborShift,
    Money, OrderLineItem, OrderLineItemModifier, Payment, PaymentRefund, PickupDetails,
    Recipient, SquareOrder, TeamMember, TeamMemberWage,
};
use crate::error::PosError;

/// Line item metadata key carrying the canonical menu item id.
pub const MENU_ITEM_METADATA_KEY: &str = "menu_item_id";

/// Order metadata key for free-form notes.
pub const NOTES_METADATA_KEY: &str = "notes";

const UNCATEGORIZED: &str = "Uncategorized";

// =============================================================================
// Money
// =============================================================================

fn currency_of(money: &Money) -> CurrencyCode {
    CurrencyCode::from_code(&money.currency).unwrap_or_default()
}

/// Decimal amount of optional money, zero when absent.
#[must_use]
pub fn amount(money: Option<&Money>) -> Decimal {
    money.map_or(Decimal::ZERO, |m| from_minor_units(m.amount, currency_of(m)))
}

/// Money in minor units.
///
/// # Errors
///
/// `INVALID_REQUEST` if the amount does not fit.
pub fn to_money(value: Decimal, currency: CurrencyCode) -> Result<Money, PosError> {
    let minor = to_minor_units(value, currency)
        .ok_or_else(|| PosError::InvalidRequest(format!("amount {value} is out of range")))?;
    Ok(Money {
        amount: minor,
        currency: currency.code().to_string(),
    })
}

fn parse_quantity(raw: &str) -> Result<Decimal, PosError> {
    raw.trim()
        .parse()
        .map_err(|_| PosError::Mapping(format!("invalid quantity '{raw}'")))
}

// =============================================================================
// Catalog
// =============================================================================

/// Lookups from related catalog objects needed to build menu items.
#[derive(Debug, Default)]
pub struct CatalogIndex<'a> {
    categories: HashMap<&'a str, &'a str>,
    modifier_lists: HashMap<&'a str, &'a CatalogObject>,
}

impl<'a> CatalogIndex<'a> {
    #[must_use]
    pub fn new(objects: &'a [CatalogObject]) -> Self {
        let mut index = Self::default();
        for object in objects {
            if let Some(name) = object.category_data.as_ref().and_then(|c| c.name.as_deref()) {
                index.categories.insert(object.id.as_str(), name);
            }
            if object.modifier_list_data.is_some() {
                index.modifier_lists.insert(object.id.as_str(), object);
            }
        }
        index
    }

    fn category(&self, id: Option<&str>) -> String {
        id.and_then(|id| self.categories.get(id))
            .map_or_else(|| UNCATEGORIZED.to_string(), ToString::to_string)
    }
}

fn item_data(object: &CatalogObject) -> Result<&CatalogItem, PosError> {
    object
        .item_data
        .as_ref()
        .ok_or_else(|| PosError::Mapping(format!("catalog object {} is not an ITEM", object.id)))
}

fn first_variation(item: &CatalogItem) -> Option<(&CatalogObject, &CatalogItemVariation)> {
    item.variations
        .iter()
        .find_map(|v| v.item_variation_data.as_ref().map(|data| (v, data)))
}

fn modifiers(item: &CatalogItem, index: &CatalogIndex<'_>) -> Vec<Modifier> {
    item.modifier_list_info
        .iter()
        .filter(|info| info.enabled != Some(false))
        .filter_map(|info| {
            let list = index.modifier_lists.get(info.modifier_list_id.as_str())?;
            let data = list.modifier_list_data.as_ref()?;
            let options: Vec<ModifierOption> = data
                .modifiers
                .iter()
                .filter_map(|m| {
                    let modifier = m.modifier_data.as_ref()?;
                    Some(ModifierOption {
                        id: ModifierId::new(m.id.clone()),
                        name: modifier.name.clone().unwrap_or_default(),
                        price: amount(modifier.price_money.as_ref()),
                        is_available: m.is_deleted != Some(true),
                    })
                })
                .collect();
            let option_count = u32::try_from(options.len()).unwrap_or(u32::MAX);
            let min_selections = info
                .min_selected_modifiers
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            let max_selections = info
                .max_selected_modifiers
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(if data.selection_type.as_deref() == Some("SINGLE") {
                    1
                } else {
                    option_count
                });
            Some(Modifier {
                id: ModifierId::new(list.id.clone()),
                name: data.name.clone().unwrap_or_default(),
                options,
                required: min_selections > 0,
                min_selections,
                max_selections,
            })
        })
        .collect()
}

/// Canonical menu item from a Square `ITEM`.
///
/// # Errors
///
/// `INVALID_RESPONSE` if the object carries no item data.
pub fn menu_item(object: &CatalogObject, index: &CatalogIndex<'_>) -> Result<MenuItem, PosError> {
    let item = item_data(object)?;
    let variation = first_variation(item).map(|(_, data)| data);

    Ok(MenuItem {
        id: MenuItemId::new(object.id.clone()),
        name: item.name.clone().unwrap_or_default(),
        description: item.description.clone(),
        price: amount(variation.and_then(|v| v.price_money.as_ref())),
        category: index.category(item.category_id.as_deref()),
        is_available: item.is_archived != Some(true) && object.is_deleted != Some(true),
        modifiers: modifiers(item, index),
        sku: variation.and_then(|v| v.sku.clone()),
        image_url: None,
        preparation_time: None,
        allergens: Vec::new(),
        created_at: object.created_at,
        updated_at: object.updated_at,
    })
}

/// New `ITEM` with a single fixed-price variation.
///
/// # Errors
///
/// `INVALID_REQUEST` for blank names or unrepresentable prices.
pub fn new_catalog_item(
    new: &NewMenuItem,
    category_id: Option<String>,
    currency: CurrencyCode,
) -> Result<CatalogObject, PosError> {
    if new.name.trim().is_empty() {
        return Err(PosError::InvalidRequest(
            "menu item name cannot be blank".to_string(),
        ));
    }
    let variation = CatalogObject {
        kind: "ITEM_VARIATION".to_string(),
        id: "#variation".to_string(),
        item_variation_data: Some(CatalogItemVariation {
            item_id: Some("#item".to_string()),
            name: Some("Regular".to_string()),
            sku: new.sku.clone(),
            pricing_type: Some("FIXED_PRICING".to_string()),
            price_money: Some(to_money(new.price, currency)?),
            ..CatalogItemVariation::default()
        }),
        ..CatalogObject::default()
    };

    Ok(CatalogObject {
        kind: "ITEM".to_string(),
        id: "#item".to_string(),
        item_data: Some(CatalogItem {
            name: Some(new.name.trim().to_string()),
            description: new.description.clone(),
            category_id,
            is_archived: Some(!new.is_available),
            variations: vec![variation],
            ..CatalogItem::default()
        }),
        ..CatalogObject::default()
    })
}

/// Apply a partial update to the `ITEM` as last read, keeping its version.
///
/// # Errors
///
/// `INVALID_RESPONSE` for non-item objects, `INVALID_REQUEST` for bad prices.
pub fn apply_update(
    object: &mut CatalogObject,
    update: &MenuItemUpdate,
    category_id: Option<String>,
    currency: CurrencyCode,
) -> Result<(), PosError> {
    let price = update.price.map(|p| to_money(p, currency)).transpose()?;
    let id = object.id.clone();
    let item = object
        .item_data
        .as_mut()
        .ok_or_else(|| PosError::Mapping(format!("catalog object {id} is not an ITEM")))?;

    if let Some(name) = &update.name {
        item.name = Some(name.trim().to_string());
    }
    if let Some(description) = &update.description {
        item.description = Some(description.clone());
    }
    if category_id.is_some() {
        item.category_id = category_id;
    }
    if let Some(is_available) = update.is_available {
        item.is_archived = Some(!is_available);
    }
    if let Some(variation) = item
        .variations
        .iter_mut()
        .find_map(|v| v.item_variation_data.as_mut())
    {
        if let Some(price) = price {
            variation.price_money = Some(price);
            variation.pricing_type = Some("FIXED_PRICING".to_string());
        }
        if let Some(sku) = &update.sku {
            variation.sku = Some(sku.clone());
        }
    }
    Ok(())
}

// =============================================================================
// Inventory
// =============================================================================

/// Tracked variations of catalog items with their category names.
#[must_use]
pub fn tracked_variations<'a>(
    items: &'a [CatalogObject],
    index: &CatalogIndex<'_>,
) -> Vec<(&'a CatalogObject, &'a CatalogObject, String)> {
    items
        .iter()
        .filter_map(|object| object.item_data.as_ref().map(|item| (object, item)))
        .flat_map(|(object, item)| {
            let category = index.category(item.category_id.as_deref());
            item.variations
                .iter()
                .filter(|v| {
                    v.item_variation_data
                        .as_ref()
                        .is_some_and(|d| d.track_inventory == Some(true))
                })
                .map(move |v| (object, v, category.clone()))
        })
        .collect()
}

/// Canonical inventory item for a tracked variation.
///
/// # Errors
///
/// `INVALID_RESPONSE` for unparseable counts.
pub fn inventory_item(
    item: &CatalogObject,
    variation: &CatalogObject,
    category: String,
    count: Option<&InventoryCount>,
) -> Result<InventoryItem, PosError> {
    let data = variation.item_variation_data.clone().unwrap_or_default();
    let item_name = item
        .item_data
        .as_ref()
        .and_then(|i| i.name.clone())
        .unwrap_or_default();
    let name = match data.name.as_deref() {
        None | Some("" | "Regular") => item_name,
        Some(variation_name) => format!("{item_name} ({variation_name})"),
    };
    let minimum_stock = match (data.inventory_alert_type.as_deref(), data.inventory_alert_threshold) {
        (Some("LOW_QUANTITY"), Some(threshold)) => Decimal::from(threshold),
        _ => Decimal::ZERO,
    };
    let current_stock = count
        .map(|c| parse_quantity(&c.quantity))
        .transpose()?
        .unwrap_or(Decimal::ZERO);

    Ok(InventoryItem {
        id: InventoryItemId::new(variation.id.clone()),
        name,
        sku: data.sku,
        category: Some(category),
        current_stock,
        unit: "each".to_string(),
        minimum_stock,
        maximum_stock: None,
        alert_threshold: None,
        cost_per_unit: None,
        supplier: None,
        last_updated: count
            .and_then(|c| c.calculated_at)
            .or(variation.updated_at)
            .unwrap_or_else(Utc::now),
    })
}

// =============================================================================
// Labor
// =============================================================================

/// Canonical employee from a team member and their first wage.
#[must_use]
pub fn employee(member: &TeamMember, wage: Option<&TeamMemberWage>) -> Employee {
    Employee {
        id: EmployeeId::new(member.id.clone()),
        first_name: member.given_name.clone().unwrap_or_default(),
        last_name: member.family_name.clone().unwrap_or_default(),
        email: member.email_address.clone(),
        phone: member.phone_number.clone(),
        role: wage
            .and_then(|w| w.title.clone())
            .unwrap_or_else(|| "Team Member".to_string()),
        hourly_rate: wage
            .and_then(|w| w.hourly_rate.as_ref())
            .map(|m| amount(Some(m))),
        is_active: member.status.as_deref() != Some("INACTIVE"),
        hire_date: member.created_at.map(|at| at.date_naive()),
    }
}

/// Canonical shift, with hours and pay recomputed from unpaid breaks.
///
/// # Errors
///
/// `INVALID_RESPONSE` if the shift has no id.
pub fn shift(labor: &LaborShift) -> Result<Shift, PosError> {
    let id = labor
        .id
        .clone()
        .ok_or_else(|| PosError::Mapping("shift without id".to_string()))?;
    let hourly_rate = labor
        .wage
        .as_ref()
        .and_then(|w| w.hourly_rate.as_ref())
        .map(|m| amount(Some(m)));

    let mut shift = Shift::open(
        ShiftId::new(id),
        EmployeeId::new(labor.team_member_id.clone()),
        labor.start_at,
        hourly_rate,
    );
    shift.break_minutes = labor
        .breaks
        .iter()
        .filter(|b| !b.is_paid)
        .filter_map(|b| b.end_at.map(|end| (end - b.start_at).num_minutes()))
        .filter_map(|minutes| u32::try_from(minutes).ok())
        .sum();
    if let Some(end_at) = labor.end_at {
        shift.close(end_at);
    }
    shift.status = labor
        .status
        .as_deref()
        .map_or(shift.status, |s| mapping::SHIFT_STATUS.resolve(s));
    Ok(shift)
}

// =============================================================================
// Orders
// =============================================================================

fn order_item(line: &OrderLineItem, order_id: &str, position: usize) -> Result<OrderItem, PosError> {
    let quantity = parse_quantity(&line.quantity)?;
    let unit_price = amount(line.base_price_money.as_ref());
    let modifiers: Vec<OrderModifier> = line
        .modifiers
        .iter()
        .enumerate()
        .map(|(k, m)| OrderModifier {
            id: ModifierId::new(
                m.catalog_object_id
                    .clone()
                    .or_else(|| m.uid.clone())
                    .unwrap_or_else(|| format!("{order_id}-{position}-{k}")),
            ),
            name: m.name.clone().unwrap_or_default(),
            price: amount(m.total_price_money.as_ref().or(m.base_price_money.as_ref())),
        })
        .collect();

    let menu_item_id = line
        .metadata
        .as_ref()
        .and_then(|meta| meta.get(MENU_ITEM_METADATA_KEY).cloned())
        .or_else(|| line.catalog_object_id.clone())
        .unwrap_or_else(|| format!("adhoc:{}", line.name.clone().unwrap_or_default()));

    let total_price = line
        .gross_sales_money
        .as_ref()
        .or(line.total_money.as_ref())
        .map_or_else(
            || unit_price * quantity + modifiers.iter().map(|m| m.price).sum::<Decimal>(),
            |m| amount(Some(m)),
        );

    Ok(OrderItem {
        id: OrderItemId::new(
            line.uid
                .clone()
                .unwrap_or_else(|| format!("{order_id}-{position}")),
        ),
        menu_item_id: MenuItemId::new(menu_item_id),
        name: line.name.clone().unwrap_or_default(),
        quantity: quantity.ceil().to_u32().unwrap_or(1),
        unit_price,
        total_price,
        modifiers,
        special_instructions: line.note.clone(),
    })
}

fn customer(fulfillment: Option<&Fulfillment>) -> Option<CustomerInfo> {
    let recipient = fulfillment?.pickup_details.as_ref()?.recipient.as_ref()?;
    Some(CustomerInfo {
        name: recipient.display_name.clone(),
        email: recipient.email_address.clone(),
        phone: recipient.phone_number.clone(),
    })
}

/// Canonical order. Totals are passed through as Square reports them.
///
/// # Errors
///
/// `INVALID_RESPONSE` for orders without id or creation time, or with
/// unparseable quantities.
pub fn order(square: &SquareOrder) -> Result<Order, PosError> {
    let id = square
        .id
        .clone()
        .ok_or_else(|| PosError::Mapping("order without id".to_string()))?;
    let created_at = square
        .created_at
        .ok_or_else(|| PosError::Mapping(format!("order {id} has no created_at")))?;

    let items = square
        .line_items
        .iter()
        .enumerate()
        .map(|(position, line)| order_item(line, &id, position))
        .collect::<Result<Vec<_>, _>>()?;

    let fulfillment = square.fulfillments.first();
    let total = amount(square.total_money.as_ref());
    let tax = amount(square.total_tax_money.as_ref());
    let tip = amount(square.total_tip_money.as_ref());
    let discount = amount(square.total_discount_money.as_ref());

    let mut status = mapping::order_status(
        square.state.as_deref(),
        fulfillment.and_then(|f| f.state.as_deref()),
    );
    let refunded: Decimal = square
        .refunds
        .iter()
        .filter(|r| r.status.as_deref() == Some("COMPLETED"))
        .map(|r| amount(r.amount_money.as_ref()))
        .sum();
    if status == OrderStatus::Completed && total > Decimal::ZERO && refunded >= total {
        status = OrderStatus::Refunded;
    }

    let order_number = square
        .ticket_name
        .clone()
        .or_else(|| square.reference_id.clone())
        .unwrap_or_else(|| id.chars().take(6).collect::<String>().to_uppercase());

    Ok(Order {
        order_number,
        status,
        order_type: fulfillment
            .and_then(|f| f.kind.as_deref())
            .map_or(OrderType::DineIn, |kind| mapping::FULFILLMENT_TYPE.resolve(kind)),
        subtotal: items.iter().map(|i| i.total_price).sum(),
        items,
        tax,
        tip,
        discount,
        total,
        customer: customer(fulfillment),
        employee_id: None,
        table_number: None,
        notes: square
            .metadata
            .as_ref()
            .and_then(|m| m.get(NOTES_METADATA_KEY).cloned()),
        created_at,
        updated_at: square.updated_at,
        completed_at: square.closed_at,
        id: OrderId::new(id),
    })
}

/// Order creation body. Lines are ad hoc, keyed back to menu items through
/// line metadata.
///
/// # Errors
///
/// `INVALID_REQUEST` for empty orders, zero quantities or unrepresentable
/// prices.
pub fn new_order(
    new: &NewOrder,
    location_id: &str,
    currency: CurrencyCode,
) -> Result<SquareOrder, PosError> {
    if new.items.is_empty() {
        return Err(PosError::InvalidRequest(
            "order must contain at least one item".to_string(),
        ));
    }

    let line_items = new
        .items
        .iter()
        .map(|line| {
            if line.quantity == 0 {
                return Err(PosError::InvalidRequest(format!(
                    "quantity for {} must be at least 1",
                    line.menu_item_id
                )));
            }
            let modifiers = line
                .modifiers
                .iter()
                .map(|m| {
                    Ok(OrderLineItemModifier {
                        name: Some(m.name.clone()),
                        base_price_money: Some(to_money(m.price, currency)?),
                        ..OrderLineItemModifier::default()
                    })
                })
                .collect::<Result<Vec<_>, PosError>>()?;
            Ok(OrderLineItem {
                name: Some(line.name.clone()),
                quantity: line.quantity.to_string(),
                base_price_money: Some(to_money(line.unit_price, currency)?),
                modifiers,
                note: line.special_instructions.clone(),
                metadata: Some(HashMap::from([(
                    MENU_ITEM_METADATA_KEY.to_string(),
                    line.menu_item_id.to_string(),
                )])),
                ..OrderLineItem::default()
            })
        })
        .collect::<Result<Vec<_>, PosError>>()?;

    let fulfillments = match new.order_type {
        OrderType::DineIn => Vec::new(),
        order_type => vec![Fulfillment {
            kind: Some(
                mapping::FULFILLMENT_TYPE
                    .vendor_literal(order_type)
                    .unwrap_or("PICKUP")
                    .to_string(),
            ),
            state: Some("PROPOSED".to_string()),
            pickup_details: new.customer.as_ref().map(|c| PickupDetails {
                recipient: Some(Recipient {
                    display_name: c.name.clone(),
                    email_address: c.email.clone(),
                    phone_number: c.phone.clone(),
                }),
            }),
            ..Fulfillment::default()
        }],
    };

    Ok(SquareOrder {
        location_id: location_id.to_string(),
        ticket_name: new.table_number.as_ref().map(|t| format!("Table {t}")),
        line_items,
        fulfillments,
        metadata: new
            .notes
            .as_ref()
            .map(|n| HashMap::from([(NOTES_METADATA_KEY.to_string(), n.clone())])),
        ..SquareOrder::default()
    })
}

// =============================================================================
// Payments
// =============================================================================

/// Canonical transaction for a payment. `amount` includes the tip.
#[must_use]
pub fn payment_transaction(payment: &Payment) -> Transaction {
    let card = payment.card_details.as_ref().and_then(|d| d.card.as_ref());
    Transaction {
        id: TransactionId::new(payment.id.clone()),
        order_id: OrderId::new(payment.order_id.clone().unwrap_or_default()),
        amount: amount(payment.total_money.as_ref().or(payment.amount_money.as_ref())),
        tip: amount(payment.tip_money.as_ref()),
        payment_method: mapping::payment_method(
            payment.source_type.as_deref(),
            card.and_then(|c| c.card_brand.as_deref()),
        ),
        status: payment
            .status
            .as_deref()
            .map_or(TransactionStatus::Pending, |s| mapping::PAYMENT_STATUS.resolve(s)),
        processed_at: payment.created_at,
        card_last4: card.and_then(|c| c.last_4.clone()),
        reference: payment.receipt_number.clone(),
        refunded_transaction_id: None,
        refund_reason: None,
    }
}

/// Canonical transaction for a refund: negative amount linked to the payment.
#[must_use]
pub fn refund_transaction(refund: &PaymentRefund, method: Option<PaymentMethod>) -> Transaction {
    Transaction {
        id: TransactionId::new(refund.id.clone()),
        order_id: OrderId::new(refund.order_id.clone().unwrap_or_default()),
        amount: -amount(refund.amount_money.as_ref()),
        tip: Decimal::ZERO,
        payment_method: method.unwrap_or(PaymentMethod::Other),
        status: refund
            .status
            .as_deref()
            .map_or(TransactionStatus::Pending, |s| mapping::REFUND_STATUS.resolve(s)),
        processed_at: refund.created_at,
        card_last4: None,
        reference: None,
        refunded_transaction_id: refund.payment_id.clone().map(TransactionId::new),
        refund_reason: refund.reason.clone(),
    }
}

/// Amount of `payment` still refundable.
#[must_use]
pub fn refundable_balance(payment: &Payment) -> Decimal {
    amount(payment.total_money.as_ref().or(payment.amount_money.as_ref()))
        - amount(payment.refunded_money.as_ref())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn json<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_menu_item_from_catalog() {
        let related: Vec<CatalogObject> = json(serde_json::json!([
            { "type": "CATEGORY", "id": "CAT1", "category_data": { "name": "Burgers" } },
            {
                "type": "MODIFIER_LIST", "id": "ML1",
                "modifier_list_data": {
                    "name": "Doneness", "selection_type": "SINGLE",
                    "modifiers": [
                        { "type": "MODIFIER", "id": "M1", "modifier_data": { "name": "Rare" } },
                        { "type": "MODIFIER", "id": "M2", "modifier_data": {
                            "name": "Extra patty", "price_money": { "amount": 350, "currency": "USD" } } }
                    ]
                }
            }
        ]));
        let object: CatalogObject = json(serde_json::json!({
            "type": "ITEM", "id": "ITEM1", "version": 7,
            "item_data": {
                "name": "Classic Burger", "category_id": "CAT1",
                "modifier_list_info": [{ "modifier_list_id": "ML1", "min_selected_modifiers": 1 }],
                "variations": [{
                    "type": "ITEM_VARIATION", "id": "VAR1",
                    "item_variation_data": {
                        "name": "Regular", "sku": "BRG-1", "pricing_type": "FIXED_PRICING",
                        "price_money": { "amount": 1299, "currency": "USD" }
                    }
                }]
            }
        }));

        let index = CatalogIndex::new(&related);
        let item = menu_item(&object, &index).unwrap();
        assert_eq!(item.price, Decimal::new(1299, 2));
        assert_eq!(item.category, "Burgers");
        assert_eq!(item.sku.as_deref(), Some("BRG-1"));
        assert!(item.is_available);
        assert_eq!(item.modifiers.len(), 1);
        assert!(item.modifiers[0].required);
        assert_eq!(item.modifiers[0].max_selections, 1);
        assert_eq!(item.modifiers[0].options[1].price, Decimal::new(350, 2));
    }

    #[test]
    fn test_archived_item_unavailable() {
        let object: CatalogObject = json(serde_json::json!({
            "type": "ITEM", "id": "ITEM2",
            "item_data": { "name": "Seasonal Pie", "is_archived": true }
        }));
        let item = menu_item(&object, &CatalogIndex::default()).unwrap();
        assert!(!item.is_available);
        assert_eq!(item.category, UNCATEGORIZED);
        assert_eq!(item.price, Decimal::ZERO);
    }

    #[test]
    fn test_non_item_rejected() {
        let object: CatalogObject =
            json(serde_json::json!({ "type": "CATEGORY", "id": "CAT1" }));
        assert!(matches!(
            menu_item(&object, &CatalogIndex::default()),
            Err(PosError::Mapping(_))
        ));
    }

    #[test]
    fn test_apply_update_keeps_version() {
        let mut object: CatalogObject = json(serde_json::json!({
            "type": "ITEM", "id": "ITEM1", "version": 12,
            "item_data": {
                "name": "Fries",
                "variations": [{ "type": "ITEM_VARIATION", "id": "V", "item_variation_data": {
                    "price_money": { "amount": 399, "currency": "USD" } } }]
            }
        }));
        let update = MenuItemUpdate {
            price: Some(Decimal::new(449, 2)),
            is_available: Some(false),
            ..MenuItemUpdate::default()
        };
        apply_update(&mut object, &update, None, CurrencyCode::USD).unwrap();

        assert_eq!(object.version, Some(12));
        let item = object.item_data.unwrap();
        assert_eq!(item.is_archived, Some(true));
        assert_eq!(
            item.variations[0].item_variation_data.as_ref().unwrap().price_money,
            Some(Money { amount: 449, currency: "USD".to_string() })
        );
    }

    #[test]
    fn test_order_passes_totals_through() {
        let square: SquareOrder = json(serde_json::json!({
            "id": "ORD123456789", "location_id": "L1", "state": "OPEN", "version": 3,
            "created_at": "2026-04-01T12:00:00Z",
            "line_items": [{
                "uid": "li-1", "name": "Burger", "quantity": "2",
                "base_price_money": { "amount": 1000, "currency": "USD" },
                "gross_sales_money": { "amount": 2100, "currency": "USD" },
                "metadata": { "menu_item_id": "ITEM1" },
                "modifiers": [{ "name": "Cheese", "total_price_money": { "amount": 100, "currency": "USD" } }]
            }],
            "fulfillments": [{ "type": "PICKUP", "state": "PREPARED" }],
            "total_money": { "amount": 2400, "currency": "USD" },
            "total_tax_money": { "amount": 183, "currency": "USD" },
            "total_tip_money": { "amount": 0, "currency": "USD" }
        }));

        let order = order(&square).unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
        assert_eq!(order.order_type, OrderType::Pickup);
        assert_eq!(order.order_number, "ORD123");
        assert_eq!(order.items[0].menu_item_id.as_str(), "ITEM1");
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.subtotal, Decimal::new(2100, 2));
        assert_eq!(order.total, Decimal::new(2400, 2));
        // Square rounded independently: total differs from subtotal + tax.
        assert_eq!(order.reconcile(Decimal::ZERO).len(), 1);
    }

    #[test]
    fn test_fully_refunded_order() {
        let square: SquareOrder = json(serde_json::json!({
            "id": "ORD1", "location_id": "L1", "state": "COMPLETED",
            "created_at": "2026-04-01T12:00:00Z",
            "total_money": { "amount": 1500, "currency": "USD" },
            "refunds": [{ "id": "R1", "status": "COMPLETED", "amount_money": { "amount": 1500, "currency": "USD" } }]
        }));
        assert_eq!(order(&square).unwrap().status, OrderStatus::Refunded);
    }

    #[test]
    fn test_new_order_body() {
        let new: NewOrder = json(serde_json::json!({
            "items": [{ "menuItemId": "ITEM1", "name": "Burger", "quantity": 2, "unitPrice": "12.99" }],
            "orderType": "takeout",
            "notes": "no onions"
        }));
        let body = new_order(&new, "L1", CurrencyCode::USD).unwrap();
        assert_eq!(body.line_items[0].quantity, "2");
        assert_eq!(body.line_items[0].base_price_money.as_ref().unwrap().amount, 1299);
        assert_eq!(body.fulfillments[0].kind.as_deref(), Some("PICKUP"));
        assert_eq!(
            body.metadata.unwrap().get(NOTES_METADATA_KEY).map(String::as_str),
            Some("no onions")
        );
    }

    #[test]
    fn test_refund_is_negative_and_linked() {
        let refund: PaymentRefund = json(serde_json::json!({
            "id": "RF1", "status": "COMPLETED", "payment_id": "PAY1", "order_id": "ORD1",
            "amount_money": { "amount": 500, "currency": "USD" },
            "created_at": "2026-04-01T13:00:00Z"
        }));
        let txn = refund_transaction(&refund, Some(PaymentMethod::Card));
        assert_eq!(txn.amount, Decimal::new(-500, 2));
        assert_eq!(txn.status, TransactionStatus::Refunded);
        assert_eq!(txn.refunded_transaction_id.unwrap().as_str(), "PAY1");
    }

    #[test]
    fn test_shift_excludes_unpaid_breaks() {
        let labor: LaborShift = json(serde_json::json!({
            "id": "SH1", "location_id": "L1", "team_member_id": "TM1",
            "start_at": "2026-04-01T09:00:00Z", "end_at": "2026-04-01T17:30:00Z",
            "status": "CLOSED",
            "wage": { "title": "Cook", "hourly_rate": { "amount": 2000, "currency": "USD" } },
            "breaks": [{ "start_at": "2026-04-01T12:00:00Z", "end_at": "2026-04-01T12:30:00Z", "is_paid": false }]
        }));
        let shift = shift(&labor).unwrap();
        assert_eq!(shift.break_minutes, 30);
        assert_eq!(shift.hours_worked, Some(Decimal::from(8)));
        assert_eq!(shift.total_pay, Some(Decimal::from(160)));
    }
}
