//! Toast wire types to canonical records and back.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use pos_bridge_core::{
    CustomerInfo, Employee, EmployeeId, InventoryItem, InventoryItemId, MenuItem, MenuItemId,
    Modifier, ModifierId, ModifierOption, NewOrder, Order, OrderId, OrderItem, OrderItemId,
    OrderModifier, OrderStatus, OrderType, Shift, ShiftId, Transaction, TransactionId,
    TransactionStatus,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use super::mapping;
use super::types::{
    Check, CheckCustomer, CheckPayment, CreateCheck, CreateOrder, CreateSelection, GuidRef, Job,
    MenuGroup, MenusResponse, Selection, StockEntry, TimeEntry, ToastEmployee, ToastMenuItem,
    ToastOrder,
};
use crate::error::PosError;

/// Suffix of the synthetic transaction id for a payment's refund.
pub const REFUND_ID_SUFFIX: &str = ":refund";

const UNCATEGORIZED: &str = "Uncategorized";

// =============================================================================
// Numbers
// =============================================================================

/// Money in major units, rounded to cents. Non-finite values become zero.
#[must_use]
pub fn money(value: Option<f64>) -> Decimal {
    value
        .and_then(Decimal::from_f64)
        .map_or(Decimal::ZERO, |d| d.round_dp(2))
}

fn quantity(value: Option<f64>) -> Decimal {
    value
        .and_then(Decimal::from_f64)
        .map_or(Decimal::ONE, |d| d.round_dp(3))
}

fn to_f64(value: Decimal) -> Result<f64, PosError> {
    value
        .to_f64()
        .ok_or_else(|| PosError::InvalidRequest(format!("amount {value} is out of range")))
}

// =============================================================================
// Menus
// =============================================================================

/// Menu items flattened out of every menu and group, first occurrence wins.
#[must_use]
pub fn menu_items(menus: &MenusResponse, stock: &HashMap<&str, &StockEntry>) -> Vec<MenuItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for menu in &menus.menus {
        for group in &menu.menu_groups {
            collect_group(group, menus, stock, &mut seen, &mut items);
        }
    }
    items
}

fn collect_group(
    group: &MenuGroup,
    menus: &MenusResponse,
    stock: &HashMap<&str, &StockEntry>,
    seen: &mut HashSet<String>,
    items: &mut Vec<MenuItem>,
) {
    let category = group.name.as_deref().unwrap_or(UNCATEGORIZED);
    for item in &group.menu_items {
        if seen.insert(item.guid.clone()) {
            items.push(menu_item(item, category, menus, stock.get(item.guid.as_str()).copied()));
        }
    }
    for nested in &group.menu_groups {
        collect_group(nested, menus, stock, seen, items);
    }
}

fn modifiers(item: &ToastMenuItem, menus: &MenusResponse) -> Vec<Modifier> {
    item.modifier_group_references
        .iter()
        .filter_map(|reference| menus.modifier_group_references.get(&reference.to_string()))
        .map(|group| {
            let options: Vec<ModifierOption> = group
                .modifier_option_references
                .iter()
                .filter_map(|reference| {
                    menus.modifier_option_references.get(&reference.to_string())
                })
                .map(|option| ModifierOption {
                    id: ModifierId::new(option.guid.clone()),
                    name: option.name.clone().unwrap_or_default(),
                    price: money(option.price),
                    is_available: true,
                })
                .collect();
            let min_selections = group.min_selections.unwrap_or(0);
            Modifier {
                id: ModifierId::new(group.guid.clone()),
                name: group.name.clone().unwrap_or_default(),
                max_selections: group
                    .max_selections
                    .unwrap_or_else(|| u32::try_from(options.len()).unwrap_or(u32::MAX)),
                options,
                required: min_selections > 0,
                min_selections,
            }
        })
        .collect()
}

/// Canonical menu item. Items stocked out are unavailable.
#[must_use]
pub fn menu_item(
    item: &ToastMenuItem,
    category: &str,
    menus: &MenusResponse,
    stock: Option<&StockEntry>,
) -> MenuItem {
    MenuItem {
        id: MenuItemId::new(item.guid.clone()),
        name: item.name.clone().unwrap_or_default(),
        description: item.description.clone().filter(|d| !d.is_empty()),
        price: money(item.price),
        category: category.to_string(),
        is_available: stock.is_none_or(|s| s.status != mapping::STOCK_OUT),
        modifiers: modifiers(item, menus),
        sku: item.sku.clone(),
        image_url: item.image.clone(),
        preparation_time: item.prep_time,
        allergens: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

/// Canonical inventory item for a quantity-tracked stock entry.
#[must_use]
pub fn inventory_item(
    entry: &StockEntry,
    item: Option<&MenuItem>,
    observed_at: DateTime<Utc>,
) -> InventoryItem {
    InventoryItem {
        id: InventoryItemId::new(entry.guid.clone()),
        name: item.map_or_else(|| entry.guid.clone(), |i| i.name.clone()),
        sku: item.and_then(|i| i.sku.clone()),
        category: item.map(|i| i.category.clone()),
        current_stock: entry
            .quantity
            .and_then(Decimal::from_f64)
            .map_or(Decimal::ZERO, |d| d.round_dp(3)),
        unit: "each".to_string(),
        minimum_stock: Decimal::ZERO,
        maximum_stock: None,
        alert_threshold: None,
        cost_per_unit: None,
        supplier: None,
        last_updated: observed_at,
    }
}

// =============================================================================
// Labor
// =============================================================================

/// Canonical employee. Role and rate come from the first job reference.
#[must_use]
pub fn employee(employee: &ToastEmployee, jobs: &HashMap<&str, &Job>) -> Employee {
    let job = employee
        .job_references
        .iter()
        .find_map(|r| jobs.get(r.guid.as_str()).copied());
    let hourly_rate = job.and_then(|job| {
        employee
            .wage_overrides
            .iter()
            .find(|o| o.job_reference.guid == job.guid)
            .map(|o| money(Some(o.wage)))
            .or_else(|| {
                job.default_wage
                    .filter(|_| job.wage_frequency.as_deref() != Some("SALARY"))
                    .map(|w| money(Some(w)))
            })
    });

    Employee {
        id: EmployeeId::new(employee.guid.clone()),
        first_name: employee.first_name.clone().unwrap_or_default(),
        last_name: employee.last_name.clone().unwrap_or_default(),
        email: employee.email.clone(),
        phone: employee.phone_number.clone(),
        role: job
            .and_then(|j| j.title.clone())
            .unwrap_or_else(|| "Employee".to_string()),
        hourly_rate,
        is_active: !employee.deleted,
        hire_date: employee.created_date.map(|at| at.date_naive()),
    }
}

/// Canonical shift for a time entry. Unpaid breaks are excluded from hours.
#[must_use]
pub fn shift(entry: &TimeEntry) -> Shift {
    let mut shift = Shift::open(
        ShiftId::new(entry.guid.clone()),
        EmployeeId::new(entry.employee_reference.guid.clone()),
        entry.in_date,
        entry.hourly_wage.map(|w| money(Some(w))),
    );
    shift.break_minutes = entry
        .breaks
        .iter()
        .filter(|b| !b.paid)
        .filter_map(|b| b.out_date.map(|out| (out - b.in_date).num_minutes()))
        .filter_map(|minutes| u32::try_from(minutes).ok())
        .sum();
    if let Some(out_date) = entry.out_date {
        shift.close(out_date);
    }
    shift
}

// =============================================================================
// Orders
// =============================================================================

fn order_item(selection: &Selection, order_guid: &str, position: usize) -> OrderItem {
    let quantity = quantity(selection.quantity);
    let total_price = money(selection.pre_discount_price.or(selection.price));
    let modifiers: Vec<OrderModifier> = selection
        .modifiers
        .iter()
        .filter(|m| !m.voided)
        .enumerate()
        .map(|(k, m)| OrderModifier {
            id: ModifierId::new(
                m.item
                    .as_ref()
                    .map(|i| i.guid.clone())
                    .or_else(|| m.guid.clone())
                    .unwrap_or_else(|| format!("{order_guid}-{position}-{k}")),
            ),
            name: m.display_name.clone().unwrap_or_default(),
            price: money(m.price),
        })
        .collect();
    let modifier_total: Decimal = modifiers.iter().map(|m| m.price).sum();
    let unit_price = if quantity.is_zero() {
        Decimal::ZERO
    } else {
        ((total_price - modifier_total) / quantity).round_dp(2)
    };
    let name = selection.display_name.clone().unwrap_or_default();

    OrderItem {
        id: OrderItemId::new(
            selection
                .guid
                .clone()
                .unwrap_or_else(|| format!("{order_guid}-{position}")),
        ),
        menu_item_id: MenuItemId::new(
            selection
                .item
                .as_ref()
                .map_or_else(|| format!("adhoc:{name}"), |i| i.guid.clone()),
        ),
        name,
        quantity: quantity.ceil().to_u32().unwrap_or(1),
        unit_price,
        total_price,
        modifiers,
        special_instructions: selection.special_request.clone(),
    }
}

fn live_checks(order: &ToastOrder) -> impl Iterator<Item = &Check> {
    order.checks.iter().filter(|c| !c.voided)
}

fn status(order: &ToastOrder) -> OrderStatus {
    if order.voided || order.deleted {
        return OrderStatus::Cancelled;
    }

    let payments: Vec<&CheckPayment> = live_checks(order).flat_map(|c| &c.payments).collect();
    let fully_refunded = !payments.is_empty()
        && payments
            .iter()
            .all(|p| p.refund_status.as_deref() == Some("FULL"));
    let checks_closed = live_checks(order).next().is_some()
        && live_checks(order).all(|c| {
            c.payment_status
                .as_deref()
                .is_some_and(|s| mapping::CHECK_PAYMENT_STATUS.resolve(s) == OrderStatus::Completed)
        });

    if order.closed_date.is_some() || checks_closed {
        return if fully_refunded {
            OrderStatus::Refunded
        } else {
            OrderStatus::Completed
        };
    }

    let approval = order
        .approval_status
        .as_deref()
        .map_or(OrderStatus::Pending, |s| mapping::APPROVAL_STATUS.resolve(s));
    if approval == OrderStatus::Pending {
        return approval;
    }

    mapping::kitchen_status(
        live_checks(order)
            .flat_map(|c| &c.selections)
            .filter(|s| !s.voided)
            .filter_map(|s| s.fulfillment_status.as_deref()),
    )
    .unwrap_or(OrderStatus::Pending)
}

fn customer(check: &Check) -> Option<CustomerInfo> {
    let customer = check.customer.as_ref()?;
    let name = [customer.first_name.as_deref(), customer.last_name.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    Some(CustomerInfo {
        name: (!name.is_empty()).then_some(name),
        email: customer.email.clone(),
        phone: customer.phone.clone(),
    })
}

/// Canonical order, summed over its non-voided checks.
///
/// `subtotal` is before discounts; `total` is the checks' totals plus tips.
///
/// # Errors
///
/// `INVALID_RESPONSE` for orders without a creation time.
pub fn order(toast: &ToastOrder) -> Result<Order, PosError> {
    let created_at = toast
        .created_date
        .or(toast.opened_date)
        .ok_or_else(|| PosError::Mapping(format!("order {} has no created date", toast.guid)))?;

    let items: Vec<OrderItem> = live_checks(toast)
        .flat_map(|c| &c.selections)
        .filter(|s| !s.voided)
        .enumerate()
        .map(|(position, selection)| order_item(selection, &toast.guid, position))
        .collect();

    let discount: Decimal = live_checks(toast)
        .flat_map(|c| &c.applied_discounts)
        .map(|d| money(d.discount_amount))
        .sum();
    let tip: Decimal = live_checks(toast)
        .flat_map(|c| &c.payments)
        .map(|p| money(p.tip_amount))
        .sum();
    let amount: Decimal = live_checks(toast).map(|c| money(c.amount)).sum();
    let tax: Decimal = live_checks(toast).map(|c| money(c.tax_amount)).sum();
    let checks_total: Decimal = live_checks(toast).map(|c| money(c.total_amount)).sum();

    Ok(Order {
        id: OrderId::new(toast.guid.clone()),
        order_number: toast.display_number.clone().unwrap_or_else(|| {
            toast.guid.chars().take(8).collect::<String>().to_uppercase()
        }),
        status: status(toast),
        order_type: toast
            .dining_option
            .as_ref()
            .and_then(|d| d.behavior.as_deref())
            .map_or(OrderType::DineIn, |b| mapping::DINING_BEHAVIOR.resolve(b)),
        items,
        subtotal: amount + discount,
        tax,
        tip,
        discount,
        total: checks_total + tip,
        customer: live_checks(toast).find_map(customer),
        employee_id: toast.server.as_ref().map(|s| EmployeeId::new(s.guid.clone())),
        table_number: toast.table.as_ref().and_then(|t| t.name.clone()),
        notes: None,
        created_at,
        updated_at: toast.modified_date,
        completed_at: toast.closed_date,
    })
}

/// Payments on the order's checks, each followed by its refund if any.
#[must_use]
pub fn transactions(toast: &ToastOrder) -> Vec<Transaction> {
    let order_id = OrderId::new(toast.guid.clone());
    let created = toast.created_date.or(toast.opened_date);
    let mut transactions = Vec::new();

    for payment in live_checks(toast).flat_map(|c| &c.payments) {
        let method = payment
            .kind
            .as_deref()
            .map_or(mapping::PAYMENT_TYPE.fallback(), |k| mapping::PAYMENT_TYPE.resolve(k));
        let processed_at = payment.paid_date.or(created).unwrap_or_else(Utc::now);
        let tip = money(payment.tip_amount);

        transactions.push(Transaction {
            id: TransactionId::new(payment.guid.clone()),
            order_id: order_id.clone(),
            amount: money(payment.amount) + tip,
            tip,
            payment_method: method,
            status: payment
                .payment_status
                .as_deref()
                .map_or(TransactionStatus::Pending, |s| mapping::PAYMENT_STATUS.resolve(s)),
            processed_at,
            card_last4: payment.last4_digits.clone(),
            reference: None,
            refunded_transaction_id: None,
            refund_reason: None,
        });

        if let (true, Some(refund)) = (
            mapping::is_refunded(payment.refund_status.as_deref()),
            payment.refund.as_ref(),
        ) {
            transactions.push(Transaction {
                id: TransactionId::new(format!("{}{REFUND_ID_SUFFIX}", payment.guid)),
                order_id: order_id.clone(),
                amount: -(money(refund.refund_amount) + money(refund.tip_refund_amount)),
                tip: -money(refund.tip_refund_amount),
                payment_method: method,
                status: TransactionStatus::Refunded,
                processed_at: refund.refund_date.unwrap_or(processed_at),
                card_last4: payment.last4_digits.clone(),
                reference: None,
                refunded_transaction_id: Some(TransactionId::new(payment.guid.clone())),
                refund_reason: None,
            });
        }
    }
    transactions
}

/// Order creation body with one check holding every line.
///
/// # Errors
///
/// `INVALID_REQUEST` for empty orders, zero quantities or unrepresentable
/// prices.
pub fn new_order(new: &NewOrder) -> Result<CreateOrder, PosError> {
    if new.items.is_empty() {
        return Err(PosError::InvalidRequest(
            "order must contain at least one item".to_string(),
        ));
    }

    let selections = new
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
                .filter_map(|m| m.id.as_ref().map(|id| (id, m.price)))
                .map(|(id, price)| {
                    Ok(CreateSelection {
                        item: GuidRef::new(id.as_str(), "MenuItemOption"),
                        quantity: 1.0,
                        external_price_amount: Some(to_f64(price)?),
                        modifiers: Vec::new(),
                        special_request: None,
                    })
                })
                .collect::<Result<Vec<_>, PosError>>()?;
            Ok(CreateSelection {
                item: GuidRef::new(line.menu_item_id.as_str(), "MenuItem"),
                quantity: f64::from(line.quantity),
                external_price_amount: Some(to_f64(line.unit_price)?),
                modifiers,
                special_request: line.special_instructions.clone(),
            })
        })
        .collect::<Result<Vec<_>, PosError>>()?;

    let customer = new.customer.as_ref().map(|c| {
        let mut names = c.name.as_deref().unwrap_or_default().splitn(2, ' ');
        CheckCustomer {
            first_name: names.next().filter(|n| !n.is_empty()).map(ToString::to_string),
            last_name: names.next().map(ToString::to_string),
            email: c.email.clone(),
            phone: c.phone.clone(),
        }
    });

    Ok(CreateOrder {
        dining_option: None,
        server: new
            .employee_id
            .as_ref()
            .map(|id| GuidRef::new(id.as_str(), "RestaurantUser")),
        checks: vec![CreateCheck {
            selections,
            customer,
            tab_name: new.table_number.clone(),
        }],
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn json<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    fn menus() -> MenusResponse {
        json(serde_json::json!({
            "menus": [{
                "guid": "menu-1", "name": "Dinner",
                "menuGroups": [{
                    "guid": "grp-1", "name": "Mains",
                    "menuItems": [
                        { "guid": "item-1", "name": "Burger", "price": 12.99, "modifierGroupReferences": [7] },
                        { "guid": "item-2", "name": "Salad", "price": 9.5 }
                    ],
                    "menuGroups": [{
                        "guid": "grp-2", "name": "Sides",
                        "menuItems": [{ "guid": "item-3", "name": "Fries", "price": 3.99 }]
                    }]
                }]
            }, {
                "guid": "menu-2", "name": "Lunch",
                "menuGroups": [{ "guid": "grp-3", "name": "Lunch Mains",
                    "menuItems": [{ "guid": "item-1", "name": "Burger", "price": 12.99 }] }]
            }],
            "modifierGroupReferences": {
                "7": { "guid": "mg-1", "name": "Add-ons", "minSelections": 0, "maxSelections": 2,
                       "modifierOptionReferences": [11] }
            },
            "modifierOptionReferences": {
                "11": { "guid": "mo-1", "name": "Bacon", "price": 2.0 }
            }
        }))
    }

    #[test]
    fn test_menu_flattening_dedupes_and_nests() {
        let stock_entry: StockEntry =
            json(serde_json::json!({ "guid": "item-2", "status": "OUT_OF_STOCK" }));
        let stock = HashMap::from([("item-2", &stock_entry)]);

        let items = menu_items(&menus(), &stock);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].price, Decimal::new(1299, 2));
        assert_eq!(items[0].modifiers[0].options[0].name, "Bacon");
        assert_eq!(items[0].modifiers[0].max_selections, 2);
        assert!(!items[1].is_available);
        assert_eq!(items[2].category, "Sides");
    }

    fn order_json() -> ToastOrder {
        json(serde_json::json!({
            "guid": "ord-guid-1",
            "displayNumber": "42",
            "approvalStatus": "APPROVED",
            "diningOption": { "guid": "do-1", "behavior": "TAKE_OUT" },
            "createdDate": "2026-04-01T18:00:00Z",
            "checks": [{
                "guid": "chk-1", "amount": 20.0, "taxAmount": 1.75, "totalAmount": 21.75,
                "paymentStatus": "OPEN",
                "customer": { "firstName": "Ada", "lastName": "Lovelace" },
                "appliedDiscounts": [{ "discountAmount": 2.0 }],
                "selections": [
                    { "guid": "sel-1", "item": { "guid": "item-1" }, "displayName": "Burger",
                      "quantity": 1, "preDiscountPrice": 14.0, "price": 12.0, "fulfillmentStatus": "READY",
                      "modifiers": [{ "displayName": "Bacon", "price": 2.0, "item": { "guid": "mo-1" } }] },
                    { "guid": "sel-2", "item": { "guid": "item-3" }, "displayName": "Fries",
                      "quantity": 2, "preDiscountPrice": 8.0, "fulfillmentStatus": "SENT" },
                    { "guid": "sel-3", "displayName": "Voided", "quantity": 1, "price": 5.0, "voided": true }
                ],
                "payments": [{
                    "guid": "pay-1", "amount": 21.75, "tipAmount": 3.0, "type": "CREDIT",
                    "paymentStatus": "CAPTURED", "paidDate": "2026-04-01T18:30:00Z",
                    "refundStatus": "PARTIAL",
                    "refund": { "refundAmount": 5.0, "tipRefundAmount": 0.0, "refundDate": "2026-04-02T10:00:00Z" }
                }]
            }]
        }))
    }

    #[test]
    fn test_order_totals_and_status() {
        let order = order(&order_json()).unwrap();
        assert_eq!(order.order_number, "42");
        assert_eq!(order.order_type, OrderType::Takeout);
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].unit_price, Decimal::new(1200, 2));
        assert_eq!(order.items[1].unit_price, Decimal::new(400, 2));
        assert_eq!(order.subtotal, Decimal::new(2200, 2));
        assert_eq!(order.total, Decimal::new(2475, 2));
        assert!(order.reconcile(Decimal::new(1, 2)).is_empty());
        assert_eq!(order.customer.unwrap().name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_unknown_or_missing_approval_is_pending() {
        let mut toast = order_json();
        toast.approval_status = Some("BRAND_NEW_STATE".to_string());
        assert_eq!(order(&toast).unwrap().status, OrderStatus::Pending);

        toast.approval_status = None;
        assert_eq!(order(&toast).unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn test_approved_order_without_kitchen_status_is_pending() {
        let mut toast = order_json();
        for selection in &mut toast.checks[0].selections {
            selection.fulfillment_status = None;
        }
        assert_eq!(order(&toast).unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn test_voided_order_is_cancelled() {
        let mut toast = order_json();
        toast.voided = true;
        assert_eq!(order(&toast).unwrap().status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_closed_fully_refunded_order() {
        let mut toast = order_json();
        toast.closed_date = toast.created_date;
        assert_eq!(order(&toast).unwrap().status, OrderStatus::Completed);

        toast.checks[0].payments[0].refund_status = Some("FULL".to_string());
        assert_eq!(order(&toast).unwrap().status, OrderStatus::Refunded);
    }

    #[test]
    fn test_transactions_include_refunds() {
        let transactions = transactions(&order_json());
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].amount, Decimal::new(2475, 2));
        assert_eq!(transactions[0].status, TransactionStatus::Completed);
        assert_eq!(transactions[1].amount, Decimal::new(-500, 2));
        assert_eq!(transactions[1].id.as_str(), "pay-1:refund");
        assert_eq!(
            transactions[1].refunded_transaction_id.as_ref().unwrap().as_str(),
            "pay-1"
        );
    }

    #[test]
    fn test_shift_from_time_entry() {
        let entry: TimeEntry = json(serde_json::json!({
            "guid": "te-1", "employeeReference": { "guid": "emp-1" },
            "inDate": "2026-04-01T09:00:00Z", "outDate": "2026-04-01T13:15:00Z",
            "hourlyWage": 18.0,
            "breaks": [{ "inDate": "2026-04-01T11:00:00Z", "outDate": "2026-04-01T11:15:00Z", "paid": false }]
        }));
        let shift = shift(&entry);
        assert_eq!(shift.break_minutes, 15);
        assert_eq!(shift.hours_worked, Some(Decimal::from(4)));
        assert_eq!(shift.total_pay, Some(Decimal::from(72)));
    }

    #[test]
    fn test_employee_wage_override_wins() {
        let job: Job = json(serde_json::json!({
            "guid": "job-1", "title": "Server", "defaultWage": 12.0, "wageFrequency": "HOURLY"
        }));
        let jobs = HashMap::from([("job-1", &job)]);
        let toast: ToastEmployee = json(serde_json::json!({
            "guid": "emp-1", "firstName": "Sam", "lastName": "Lee",
            "jobReferences": [{ "guid": "job-1" }],
            "wageOverrides": [{ "jobReference": { "guid": "job-1" }, "wage": 14.5 }]
        }));
        let employee = employee(&toast, &jobs);
        assert_eq!(employee.role, "Server");
        assert_eq!(employee.hourly_rate, Some(Decimal::new(1450, 2)));
        assert!(employee.is_active);
    }

    #[test]
    fn test_new_order_body() {
        let new: NewOrder = json(serde_json::json!({
            "items": [{ "menuItemId": "item-1", "name": "Burger", "quantity": 2, "unitPrice": "12.99",
                        "modifiers": [{ "id": "mo-1", "name": "Bacon", "price": "2.00" },
                                      { "name": "Ad hoc", "price": "1.00" }] }],
            "customer": { "name": "Ada Lovelace" },
            "tableNumber": "12"
        }));
        let body = new_order(&new).unwrap();
        let selection = &body.checks[0].selections[0];
        assert!((selection.quantity - 2.0).abs() < f64::EPSILON);
        assert_eq!(selection.modifiers.len(), 1);
        let customer = body.checks[0].customer.as_ref().unwrap();
        assert_eq!(customer.first_name.as_deref(), Some("Ada"));
        assert_eq!(customer.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(body.checks[0].tab_name.as_deref(), Some("12"));
    }
}
