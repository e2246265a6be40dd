//! In-memory POS data for the mock adapter.
//!
//! The store seeds a fixed catalog, inventory and staff roster, then
//! synthesizes orders, payments and refunds from a seeded RNG so the same
//! seed and anchor time always produce the same data. Mutations apply to the
//! same store, so later reads observe earlier writes.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use pos_bridge_core::{
    CurrencyCode, Employee, EmployeeId, InventoryItem, InventoryItemId, MenuItem, MenuItemId,
    MenuItemUpdate, Modifier, ModifierId, ModifierOption, NewMenuItem, NewOrder, Order,
    OrderId, OrderItem, OrderItemId, OrderModifier, OrderQuery, OrderStatus, OrderType,
    PaymentMethod, PaymentRequest, PaymentResult, ReportPeriod, SalesData, Shift, ShiftId,
    ShiftQuery, Transaction, TransactionId, TransactionQuery, TransactionStatus, WebhookId,
    WebhookRegistration, round_money, within_range,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::error::{PosError, validate_webhook};
use crate::reporting::aggregate_sales;

/// Orders synthesized at startup.
pub const ORDER_COUNT: usize = 50;

/// Orders are spread over this many days before the anchor time.
pub const ORDER_WINDOW_DAYS: i64 = 30;

/// Sales tax applied when totals are computed locally (8.75%).
pub const TAX_RATE: Decimal = Decimal::from_parts(875, 0, 0, false, 4);

/// Share of completed orders that receive a refund.
pub const REFUND_RATE: f64 = 0.10;

/// Order status distribution for synthesized orders.
pub const ORDER_STATUS_WEIGHTS: [(OrderStatus, u32); 6] = [
    (OrderStatus::Completed, 70),
    (OrderStatus::Preparing, 8),
    (OrderStatus::Ready, 7),
    (OrderStatus::Confirmed, 5),
    (OrderStatus::Pending, 5),
    (OrderStatus::Cancelled, 5),
];

/// Order type distribution for synthesized orders.
pub const ORDER_TYPE_WEIGHTS: [(OrderType, u32); 4] = [
    (OrderType::DineIn, 45),
    (OrderType::Takeout, 30),
    (OrderType::Delivery, 15),
    (OrderType::Pickup, 10),
];

/// Payment method distribution for synthesized payments.
pub const PAYMENT_METHOD_WEIGHTS: [(PaymentMethod, u32); 4] = [
    (PaymentMethod::Card, 60),
    (PaymentMethod::Cash, 25),
    (PaymentMethod::Mobile, 12),
    (PaymentMethod::GiftCard, 3),
];

fn cents(amount: i64) -> Decimal {
    Decimal::new(amount, 2)
}

fn money(amount: Decimal) -> Decimal {
    round_money(amount, CurrencyCode::USD)
}

/// Pick from a weight table.
fn weighted<T: Copy>(rng: &mut StdRng, table: &[(T, u32)]) -> Option<T> {
    let total: u32 = table.iter().map(|(_, weight)| weight).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.random_range(0..total);
    for &(value, weight) in table {
        if roll < weight {
            return Some(value);
        }
        roll -= weight;
    }
    None
}

// =============================================================================
// Seed data
// =============================================================================

struct MenuSeed {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    price_cents: i64,
    preparation_time: u32,
    allergens: &'static [&'static str],
    burger_modifiers: bool,
}

const MENU: [MenuSeed; 12] = [
    MenuSeed { name: "Classic Burger", description: "Quarter-pound beef patty, lettuce, tomato, house sauce", category: "Burgers", price_cents: 1299, preparation_time: 12, allergens: &["gluten", "dairy"], burger_modifiers: true },
    MenuSeed { name: "Bacon Cheeseburger", description: "Beef patty, cheddar, smoked bacon", category: "Burgers", price_cents: 1499, preparation_time: 14, allergens: &["gluten", "dairy"], burger_modifiers: true },
    MenuSeed { name: "Veggie Burger", description: "Black bean patty, avocado, pickled onion", category: "Burgers", price_cents: 1349, preparation_time: 12, allergens: &["gluten", "soy"], burger_modifiers: true },
    MenuSeed { name: "Grilled Salmon", description: "Atlantic salmon, lemon butter, seasonal greens", category: "Mains", price_cents: 2299, preparation_time: 18, allergens: &["fish", "dairy"], burger_modifiers: false },
    MenuSeed { name: "Chicken Caesar Salad", description: "Romaine, grilled chicken, parmesan, croutons", category: "Mains", price_cents: 1399, preparation_time: 8, allergens: &["gluten", "dairy", "egg"], burger_modifiers: false },
    MenuSeed { name: "Margherita Pizza", description: "San Marzano tomato, mozzarella, basil", category: "Mains", price_cents: 1549, preparation_time: 15, allergens: &["gluten", "dairy"], burger_modifiers: false },
    MenuSeed { name: "French Fries", description: "Hand-cut, sea salt", category: "Sides", price_cents: 499, preparation_time: 6, allergens: &[], burger_modifiers: false },
    MenuSeed { name: "Onion Rings", description: "Beer-battered", category: "Sides", price_cents: 549, preparation_time: 7, allergens: &["gluten"], burger_modifiers: false },
    MenuSeed { name: "Side Salad", description: "Mixed greens, vinaigrette", category: "Sides", price_cents: 599, preparation_time: 4, allergens: &[], burger_modifiers: false },
    MenuSeed { name: "Fountain Soda", description: "Free refills", category: "Drinks", price_cents: 299, preparation_time: 1, allergens: &[], burger_modifiers: false },
    MenuSeed { name: "Iced Tea", description: "Fresh-brewed black tea", category: "Drinks", price_cents: 329, preparation_time: 1, allergens: &[], burger_modifiers: false },
    MenuSeed { name: "Craft Beer", description: "Rotating local IPA", category: "Drinks", price_cents: 750, preparation_time: 2, allergens: &["gluten"], burger_modifiers: false },
];

struct InventorySeed {
    name: &'static str,
    category: &'static str,
    unit: &'static str,
    current: i64,
    minimum: i64,
    maximum: i64,
    threshold: Option<i64>,
    cost_cents: i64,
    supplier: &'static str,
}

const INVENTORY: [InventorySeed; 10] = [
    InventorySeed { name: "Ground Beef", category: "Protein", unit: "lb", current: 45, minimum: 20, maximum: 80, threshold: None, cost_cents: 549, supplier: "Prairie Meats" },
    InventorySeed { name: "Burger Buns", category: "Bakery", unit: "each", current: 120, minimum: 50, maximum: 300, threshold: None, cost_cents: 35, supplier: "Sunrise Bakery" },
    InventorySeed { name: "Cheddar Cheese", category: "Dairy", unit: "lb", current: 8, minimum: 10, maximum: 40, threshold: None, cost_cents: 429, supplier: "Valley Dairy" },
    InventorySeed { name: "Salmon Fillets", category: "Protein", unit: "each", current: 14, minimum: 10, maximum: 40, threshold: Some(15), cost_cents: 899, supplier: "Harbor Seafood" },
    InventorySeed { name: "Romaine Lettuce", category: "Produce", unit: "head", current: 18, minimum: 12, maximum: 48, threshold: None, cost_cents: 149, supplier: "Green Acres Produce" },
    InventorySeed { name: "Pizza Dough", category: "Bakery", unit: "each", current: 30, minimum: 15, maximum: 60, threshold: None, cost_cents: 95, supplier: "Sunrise Bakery" },
    InventorySeed { name: "Potatoes", category: "Produce", unit: "lb", current: 60, minimum: 25, maximum: 150, threshold: None, cost_cents: 79, supplier: "Green Acres Produce" },
    InventorySeed { name: "Yellow Onions", category: "Produce", unit: "lb", current: 6, minimum: 10, maximum: 40, threshold: None, cost_cents: 89, supplier: "Green Acres Produce" },
    InventorySeed { name: "Soda Syrup", category: "Beverage", unit: "gal", current: 4, minimum: 2, maximum: 12, threshold: None, cost_cents: 2450, supplier: "Metro Beverage" },
    InventorySeed { name: "Craft Beer Kegs", category: "Beverage", unit: "keg", current: 3, minimum: 2, maximum: 8, threshold: Some(3), cost_cents: 14500, supplier: "Metro Beverage" },
];

struct EmployeeSeed {
    first_name: &'static str,
    last_name: &'static str,
    role: &'static str,
    rate_cents: i64,
    is_active: bool,
    hired: (i32, u32, u32),
}

const EMPLOYEES: [EmployeeSeed; 6] = [
    EmployeeSeed { first_name: "Maria", last_name: "Garcia", role: "Manager", rate_cents: 2800, is_active: true, hired: (2019, 3, 15) },
    EmployeeSeed { first_name: "James", last_name: "Chen", role: "Server", rate_cents: 1550, is_active: true, hired: (2022, 6, 1) },
    EmployeeSeed { first_name: "Aisha", last_name: "Patel", role: "Server", rate_cents: 1550, is_active: true, hired: (2023, 2, 20) },
    EmployeeSeed { first_name: "Tom", last_name: "Becker", role: "Line Cook", rate_cents: 1900, is_active: true, hired: (2021, 9, 12) },
    EmployeeSeed { first_name: "Lucy", last_name: "Nguyen", role: "Bartender", rate_cents: 1675, is_active: true, hired: (2024, 1, 8) },
    EmployeeSeed { first_name: "Diego", last_name: "Silva", role: "Host", rate_cents: 1400, is_active: false, hired: (2023, 11, 3) },
];

fn burger_modifiers() -> Vec<Modifier> {
    let option = |id: &str, name: &str, price: i64| ModifierOption {
        id: ModifierId::new(id),
        name: name.to_string(),
        price: cents(price),
        is_available: true,
    };
    vec![
        Modifier {
            id: ModifierId::new("mod-doneness"),
            name: "Doneness".to_string(),
            options: vec![
                option("opt-medium-rare", "Medium Rare", 0),
                option("opt-medium", "Medium", 0),
                option("opt-well-done", "Well Done", 0),
            ],
            required: true,
            min_selections: 1,
            max_selections: 1,
        },
        Modifier {
            id: ModifierId::new("mod-add-ons"),
            name: "Add-ons".to_string(),
            options: vec![
                option("opt-extra-cheese", "Extra Cheese", 100),
                option("opt-bacon", "Bacon", 200),
                option("opt-avocado", "Avocado", 150),
            ],
            required: false,
            min_selections: 0,
            max_selections: 3,
        },
    ]
}

fn seed_menu(anchor: DateTime<Utc>) -> Vec<MenuItem> {
    let created_at = anchor - Duration::days(90);
    MENU.iter()
        .enumerate()
        .map(|(index, seed)| MenuItem {
            id: MenuItemId::new(format!("item-{:03}", index + 1)),
            name: seed.name.to_string(),
            description: Some(seed.description.to_string()),
            price: cents(seed.price_cents),
            category: seed.category.to_string(),
            is_available: true,
            modifiers: if seed.burger_modifiers {
                burger_modifiers()
            } else {
                Vec::new()
            },
            sku: Some(format!("SKU-{:03}", index + 1)),
            image_url: None,
            preparation_time: Some(seed.preparation_time),
            allergens: seed.allergens.iter().map(ToString::to_string).collect(),
            created_at: Some(created_at),
            updated_at: Some(created_at),
        })
        .collect()
}

fn seed_inventory(anchor: DateTime<Utc>) -> Vec<InventoryItem> {
    INVENTORY
        .iter()
        .enumerate()
        .map(|(index, seed)| InventoryItem {
            id: InventoryItemId::new(format!("inv-{:03}", index + 1)),
            name: seed.name.to_string(),
            sku: Some(format!("INV-{:03}", index + 1)),
            category: Some(seed.category.to_string()),
            current_stock: Decimal::from(seed.current),
            unit: seed.unit.to_string(),
            minimum_stock: Decimal::from(seed.minimum),
            maximum_stock: Some(Decimal::from(seed.maximum)),
            alert_threshold: seed.threshold.map(Decimal::from),
            cost_per_unit: Some(cents(seed.cost_cents)),
            supplier: Some(seed.supplier.to_string()),
            last_updated: anchor - Duration::hours(6),
        })
        .collect()
}

fn seed_employees() -> Vec<Employee> {
    EMPLOYEES
        .iter()
        .enumerate()
        .map(|(index, seed)| Employee {
            id: EmployeeId::new(format!("emp-{:03}", index + 1)),
            first_name: seed.first_name.to_string(),
            last_name: seed.last_name.to_string(),
            email: Some(format!(
                "{}.{}@example.com",
                seed.first_name.to_lowercase(),
                seed.last_name.to_lowercase()
            )),
            phone: Some(format!("555-01{:02}", index + 1)),
            role: seed.role.to_string(),
            hourly_rate: Some(cents(seed.rate_cents)),
            is_active: seed.is_active,
            hire_date: NaiveDate::from_ymd_opt(seed.hired.0, seed.hired.1, seed.hired.2),
        })
        .collect()
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Default)]
struct Sequences {
    menu_item: u32,
    shift: u32,
    order: u32,
    order_line: u32,
    transaction: u32,
    webhook: u32,
}

/// Process-lifetime mock data.
#[derive(Debug)]
pub struct MockStore {
    anchor: DateTime<Utc>,
    rng: StdRng,
    menu_items: Vec<MenuItem>,
    inventory: Vec<InventoryItem>,
    employees: Vec<Employee>,
    shifts: Vec<Shift>,
    orders: Vec<Order>,
    transactions: Vec<Transaction>,
    webhooks: Vec<WebhookRegistration>,
    seq: Sequences,
}

impl MockStore {
    /// Seed and synthesize data relative to `anchor`.
    #[must_use]
    pub fn generate(seed: u64, anchor: DateTime<Utc>) -> Self {
        let menu_items = seed_menu(anchor);
        let mut store = Self {
            anchor,
            rng: StdRng::seed_from_u64(seed),
            seq: Sequences {
                menu_item: u32::try_from(menu_items.len()).unwrap_or(u32::MAX),
                order: 1000,
                ..Sequences::default()
            },
            menu_items,
            inventory: seed_inventory(anchor),
            employees: seed_employees(),
            shifts: Vec::new(),
            orders: Vec::new(),
            transactions: Vec::new(),
            webhooks: Vec::new(),
        };
        store.generate_shifts();
        store.generate_orders();
        store
    }

    /// Time the synthetic history is generated against.
    #[must_use]
    pub const fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    fn next_shift_id(&mut self) -> ShiftId {
        self.seq.shift += 1;
        ShiftId::new(format!("shift-{:04}", self.seq.shift))
    }

    fn next_transaction_id(&mut self) -> TransactionId {
        self.seq.transaction += 1;
        TransactionId::new(format!("txn-{:04}", self.seq.transaction))
    }

    fn next_order_number(&mut self) -> u32 {
        self.seq.order += 1;
        self.seq.order
    }

    fn card_last4(&mut self, method: PaymentMethod) -> Option<String> {
        (method == PaymentMethod::Card).then(|| format!("{:04}", self.rng.random_range(0..10_000)))
    }

    fn generate_shifts(&mut self) {
        let staff: Vec<(EmployeeId, Option<Decimal>)> = self
            .employees
            .iter()
            .filter(|e| e.is_active)
            .map(|e| (e.id.clone(), e.hourly_rate))
            .collect();
        let today = self.anchor.date_naive();

        for (employee_id, rate) in staff {
            for days_ago in (1..=3).rev() {
                let start_hour = if self.rng.random_bool(0.5) { 9 } else { 16 };
                let Some(start) = (today - Duration::days(days_ago))
                    .and_hms_opt(start_hour, 0, 0)
                    .map(|naive| naive.and_utc())
                else {
                    continue;
                };
                let length = Duration::minutes(self.rng.random_range(6 * 60..=9 * 60));
                let id = self.next_shift_id();
                let mut shift = Shift::open(id, employee_id.clone(), start, rate);
                shift.break_minutes = 30;
                shift.close(start + length);
                self.shifts.push(shift);
            }
        }
    }

    fn generate_orders(&mut self) {
        let window_minutes = ORDER_WINDOW_DAYS * 24 * 60;
        let mut created: Vec<DateTime<Utc>> = (0..ORDER_COUNT)
            .map(|_| self.anchor - Duration::minutes(self.rng.random_range(1..window_minutes)))
            .collect();
        created.sort_unstable();

        let servers: Vec<EmployeeId> = self
            .employees
            .iter()
            .filter(|e| e.is_active && matches!(e.role.as_str(), "Server" | "Bartender"))
            .map(|e| e.id.clone())
            .collect();

        for created_at in created {
            let number = self.next_order_number();
            let id = OrderId::new(format!("ord-{number}"));
            let status = weighted(&mut self.rng, &ORDER_STATUS_WEIGHTS).unwrap_or_default();
            let order_type = weighted(&mut self.rng, &ORDER_TYPE_WEIGHTS).unwrap_or_default();
            let items = self.generate_lines(&id);

            let subtotal: Decimal = items.iter().map(|i| i.total_price).sum();
            let tax = money(subtotal * TAX_RATE);
            let tip = if order_type == OrderType::DineIn && status != OrderStatus::Cancelled {
                money(subtotal * Decimal::from(self.rng.random_range(0..=20)) / Decimal::from(100))
            } else {
                Decimal::ZERO
            };
            let completed_at = (status == OrderStatus::Completed).then(|| {
                (created_at + Duration::minutes(self.rng.random_range(20..=60))).min(self.anchor)
            });
            let employee_id = (!servers.is_empty())
                .then(|| servers.get(self.rng.random_range(0..servers.len())).cloned())
                .flatten();
            let table_number = (order_type == OrderType::DineIn)
                .then(|| self.rng.random_range(1..=24).to_string());

            let mut order = Order {
                id,
                order_number: number.to_string(),
                status,
                order_type,
                items,
                subtotal,
                tax,
                tip,
                discount: Decimal::ZERO,
                total: subtotal + tax + tip,
                customer: None,
                employee_id,
                table_number,
                notes: None,
                created_at,
                updated_at: Some(completed_at.unwrap_or(created_at)),
                completed_at,
            };

            if !matches!(status, OrderStatus::Pending | OrderStatus::Cancelled) {
                self.generate_payment(&mut order);
            }
            self.orders.push(order);
        }
    }

    fn generate_lines(&mut self, order_id: &OrderId) -> Vec<OrderItem> {
        let line_count = self.rng.random_range(1..=4);
        let mut lines = Vec::with_capacity(line_count);

        for line in 1..=line_count {
            let index = self.rng.random_range(0..self.menu_items.len());
            let Some(menu_item) = self.menu_items.get(index) else {
                continue;
            };
            let quantity = self.rng.random_range(1..=3);

            let mut modifiers = Vec::new();
            if let Some(add_ons) = menu_item.modifiers.iter().find(|m| !m.required)
                && self.rng.random_bool(0.3)
                && let Some(option) = add_ons
                    .options
                    .get(self.rng.random_range(0..add_ons.options.len()))
            {
                modifiers.push(OrderModifier {
                    id: option.id.clone(),
                    name: option.name.clone(),
                    price: option.price,
                });
            }

            let mut item = OrderItem {
                id: OrderItemId::new(format!("{order_id}-{line}")),
                menu_item_id: menu_item.id.clone(),
                name: menu_item.name.clone(),
                quantity,
                unit_price: menu_item.price,
                total_price: Decimal::ZERO,
                modifiers,
                special_instructions: None,
            };
            item.total_price = item.expected_total();
            lines.push(item);
        }
        lines
    }

    fn generate_payment(&mut self, order: &mut Order) {
        let method = weighted(&mut self.rng, &PAYMENT_METHOD_WEIGHTS).unwrap_or(PaymentMethod::Card);
        let paid_at = order
            .completed_at
            .unwrap_or_else(|| order.created_at + Duration::minutes(5))
            .min(self.anchor);
        let payment = Transaction {
            id: self.next_transaction_id(),
            order_id: order.id.clone(),
            amount: order.total,
            tip: order.tip,
            payment_method: method,
            status: TransactionStatus::Completed,
            processed_at: paid_at,
            card_last4: self.card_last4(method),
            reference: None,
            refunded_transaction_id: None,
            refund_reason: None,
        };

        let refund = (order.status == OrderStatus::Completed
            && self.rng.random::<f64>() < REFUND_RATE)
            .then(|| {
                let percent = Decimal::from(self.rng.random_range(25..=100));
                let amount = money(payment.amount * percent / Decimal::from(100));
                let refunded_at =
                    (paid_at + Duration::hours(self.rng.random_range(1..=48))).min(self.anchor);
                (amount, refunded_at)
            });

        let payment_amount = payment.amount;
        let payment_id = payment.id.clone();
        self.transactions.push(payment);

        if let Some((amount, refunded_at)) = refund {
            let id = self.next_transaction_id();
            self.transactions.push(Transaction {
                id,
                order_id: order.id.clone(),
                amount: -amount,
                tip: Decimal::ZERO,
                payment_method: method,
                status: TransactionStatus::Refunded,
                processed_at: refunded_at,
                card_last4: None,
                reference: None,
                refunded_transaction_id: Some(payment_id),
                refund_reason: Some("Customer complaint".to_string()),
            });
            if amount == payment_amount {
                order.status = OrderStatus::Refunded;
            }
        }
    }

    // =========================================================================
    // Menu
    // =========================================================================

    #[must_use]
    pub fn menu_items(&self) -> Vec<MenuItem> {
        self.menu_items.clone()
    }

    /// # Errors
    ///
    /// `MENU_ITEM_NOT_FOUND` for unknown ids.
    pub fn menu_item(&self, id: &MenuItemId) -> Result<MenuItem, PosError> {
        self.menu_items
            .iter()
            .find(|item| &item.id == id)
            .cloned()
            .ok_or_else(|| PosError::not_found("MENU_ITEM", id))
    }

    fn menu_item_mut(&mut self, id: &MenuItemId) -> Result<&mut MenuItem, PosError> {
        self.menu_items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| PosError::not_found("MENU_ITEM", id))
    }

    /// # Errors
    ///
    /// `INVALID_REQUEST` for a blank name or negative price.
    pub fn create_menu_item(
        &mut self,
        new: &NewMenuItem,
        now: DateTime<Utc>,
    ) -> Result<MenuItem, PosError> {
        validate_menu_fields(Some(&new.name), Some(new.price))?;

        self.seq.menu_item += 1;
        let item = MenuItem {
            id: MenuItemId::new(format!("item-{:03}", self.seq.menu_item)),
            name: new.name.trim().to_string(),
            description: new.description.clone(),
            price: new.price,
            category: new.category.clone(),
            is_available: new.is_available,
            modifiers: Vec::new(),
            sku: new.sku.clone(),
            image_url: None,
            preparation_time: new.preparation_time,
            allergens: new.allergens.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.menu_items.push(item.clone());
        Ok(item)
    }

    /// # Errors
    ///
    /// `MENU_ITEM_NOT_FOUND`, or `INVALID_REQUEST` for an empty or invalid
    /// update.
    pub fn update_menu_item(
        &mut self,
        id: &MenuItemId,
        update: &MenuItemUpdate,
        now: DateTime<Utc>,
    ) -> Result<MenuItem, PosError> {
        if update.is_empty() {
            return Err(PosError::InvalidRequest(
                "update contains no fields".to_string(),
            ));
        }
        validate_menu_fields(update.name.as_deref(), update.price)?;

        let item = self.menu_item_mut(id)?;
        update.apply_to(item);
        item.updated_at = Some(now);
        Ok(item.clone())
    }

    /// # Errors
    ///
    /// `MENU_ITEM_NOT_FOUND` for unknown ids.
    pub fn delete_menu_item(&mut self, id: &MenuItemId) -> Result<(), PosError> {
        let before = self.menu_items.len();
        self.menu_items.retain(|item| &item.id != id);
        if self.menu_items.len() == before {
            return Err(PosError::not_found("MENU_ITEM", id));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// `MENU_ITEM_NOT_FOUND` for unknown ids.
    pub fn set_menu_item_availability(
        &mut self,
        id: &MenuItemId,
        is_available: bool,
        now: DateTime<Utc>,
    ) -> Result<MenuItem, PosError> {
        let item = self.menu_item_mut(id)?;
        item.is_available = is_available;
        item.updated_at = Some(now);
        Ok(item.clone())
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    #[must_use]
    pub fn inventory_items(&self) -> Vec<InventoryItem> {
        self.inventory.clone()
    }

    /// # Errors
    ///
    /// `INVENTORY_ITEM_NOT_FOUND` for unknown ids.
    pub fn inventory_item(&self, id: &InventoryItemId) -> Result<InventoryItem, PosError> {
        self.inventory
            .iter()
            .find(|item| &item.id == id)
            .cloned()
            .ok_or_else(|| PosError::not_found("INVENTORY_ITEM", id))
    }

    /// # Errors
    ///
    /// `INVENTORY_ITEM_NOT_FOUND`, or `INVALID_REQUEST` for negative stock.
    pub fn set_inventory_level(
        &mut self,
        id: &InventoryItemId,
        quantity: Decimal,
        now: DateTime<Utc>,
    ) -> Result<InventoryItem, PosError> {
        if quantity.is_sign_negative() && !quantity.is_zero() {
            return Err(PosError::InvalidRequest(format!(
                "stock level cannot be negative (got {quantity})"
            )));
        }
        let item = self
            .inventory
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| PosError::not_found("INVENTORY_ITEM", id))?;
        item.current_stock = quantity;
        item.last_updated = now;
        Ok(item.clone())
    }

    // =========================================================================
    // Labor
    // =========================================================================

    #[must_use]
    pub fn employees(&self) -> Vec<Employee> {
        self.employees.clone()
    }

    /// # Errors
    ///
    /// `EMPLOYEE_NOT_FOUND` for unknown ids.
    pub fn employee(&self, id: &EmployeeId) -> Result<Employee, PosError> {
        self.employees
            .iter()
            .find(|e| &e.id == id)
            .cloned()
            .ok_or_else(|| PosError::not_found("EMPLOYEE", id))
    }

    /// Shifts matching `query`, most recent first.
    #[must_use]
    pub fn shifts(&self, query: &ShiftQuery) -> Vec<Shift> {
        let mut shifts: Vec<Shift> = self
            .shifts
            .iter()
            .filter(|s| query.employee_id.as_ref().is_none_or(|id| &s.employee_id == id))
            .filter(|s| within_range(s.start_time, query.start, query.end))
            .cloned()
            .collect();
        shifts.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        shifts
    }

    /// # Errors
    ///
    /// `EMPLOYEE_NOT_FOUND`, `EMPLOYEE_INACTIVE`, or `SHIFT_ALREADY_ACTIVE`
    /// when the employee is already clocked in.
    pub fn start_shift(
        &mut self,
        employee_id: &EmployeeId,
        now: DateTime<Utc>,
    ) -> Result<Shift, PosError> {
        let employee = self.employee(employee_id)?;
        if !employee.is_active {
            return Err(PosError::Rejected {
                code: "EMPLOYEE_INACTIVE",
                message: format!("{} is not an active employee", employee.full_name()),
            });
        }
        if let Some(open) = self
            .shifts
            .iter()
            .find(|s| &s.employee_id == employee_id && s.is_open())
        {
            return Err(PosError::Rejected {
                code: "SHIFT_ALREADY_ACTIVE",
                message: format!("{} already has open shift {}", employee.full_name(), open.id),
            });
        }

        let id = self.next_shift_id();
        let shift = Shift::open(id, employee.id, now, employee.hourly_rate);
        self.shifts.push(shift.clone());
        Ok(shift)
    }

    /// # Errors
    ///
    /// `SHIFT_NOT_FOUND`, or `SHIFT_NOT_ACTIVE` when already closed.
    pub fn end_shift(&mut self, id: &ShiftId, now: DateTime<Utc>) -> Result<Shift, PosError> {
        let shift = self
            .shifts
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| PosError::not_found("SHIFT", id))?;
        if !shift.is_open() {
            return Err(PosError::Rejected {
                code: "SHIFT_NOT_ACTIVE",
                message: format!("shift {id} has already ended"),
            });
        }
        shift.close(now.max(shift.start_time));
        Ok(shift.clone())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Orders matching `query`, newest first.
    #[must_use]
    pub fn orders(&self, query: &OrderQuery) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| query.status.is_none_or(|status| o.status == status))
            .filter(|o| within_range(o.created_at, query.start, query.end))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(query.limit);
        orders
    }

    /// # Errors
    ///
    /// `ORDER_NOT_FOUND` for unknown ids.
    pub fn order(&self, id: &OrderId) -> Result<Order, PosError> {
        self.orders
            .iter()
            .find(|o| &o.id == id)
            .cloned()
            .ok_or_else(|| PosError::not_found("ORDER", id))
    }

    fn order_mut(&mut self, id: &OrderId) -> Result<&mut Order, PosError> {
        self.orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| PosError::not_found("ORDER", id))
    }

    /// Create a pending order.
    ///
    /// Supplied totals are kept as-is; missing ones are computed from the
    /// lines with [`TAX_RATE`].
    ///
    /// # Errors
    ///
    /// `INVALID_REQUEST` for empty orders, zero quantities, negative prices
    /// or unknown menu items.
    pub fn create_order(&mut self, new: &NewOrder, now: DateTime<Utc>) -> Result<Order, PosError> {
        if new.items.is_empty() {
            return Err(PosError::InvalidRequest(
                "order must contain at least one item".to_string(),
            ));
        }
        for line in &new.items {
            if line.quantity == 0 {
                return Err(PosError::InvalidRequest(format!(
                    "quantity for {} must be at least 1",
                    line.menu_item_id
                )));
            }
            if line.unit_price.is_sign_negative() && !line.unit_price.is_zero() {
                return Err(PosError::InvalidRequest(format!(
                    "unit price for {} cannot be negative",
                    line.menu_item_id
                )));
            }
            if !self.menu_items.iter().any(|m| m.id == line.menu_item_id) {
                return Err(PosError::InvalidRequest(format!(
                    "unknown menu item {}",
                    line.menu_item_id
                )));
            }
        }

        let number = self.next_order_number();
        let id = OrderId::new(format!("ord-{number}"));
        let items: Vec<OrderItem> = new
            .items
            .iter()
            .map(|line| {
                self.seq.order_line += 1;
                let line_id = OrderItemId::new(format!("{id}-{}", self.seq.order_line));
                OrderItem {
                    menu_item_id: line.menu_item_id.clone(),
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    total_price: line.line_total(),
                    modifiers: line
                        .modifiers
                        .iter()
                        .enumerate()
                        .map(|(k, m)| OrderModifier {
                            id: m
                                .id
                                .clone()
                                .unwrap_or_else(|| ModifierId::new(format!("{line_id}-mod-{}", k + 1))),
                            name: m.name.clone(),
                            price: m.price,
                        })
                        .collect(),
                    special_instructions: line.special_instructions.clone(),
                    id: line_id,
                }
            })
            .collect();

        let subtotal = new
            .subtotal
            .unwrap_or_else(|| items.iter().map(|i| i.total_price).sum());
        let tax = new.tax.unwrap_or_else(|| money(subtotal * TAX_RATE));
        let tip = new.tip.unwrap_or(Decimal::ZERO);
        let total = new.total.unwrap_or(subtotal + tax + tip);

        let order = Order {
            id,
            order_number: number.to_string(),
            status: OrderStatus::Pending,
            order_type: new.order_type,
            items,
            subtotal,
            tax,
            tip,
            discount: Decimal::ZERO,
            total,
            customer: new.customer.clone(),
            employee_id: new.employee_id.clone(),
            table_number: new.table_number.clone(),
            notes: new.notes.clone(),
            created_at: now,
            updated_at: Some(now),
            completed_at: None,
        };
        self.orders.push(order.clone());
        Ok(order)
    }

    /// # Errors
    ///
    /// `ORDER_NOT_FOUND`, or `INVALID_STATUS_TRANSITION` when the order is
    /// already in a different terminal state.
    pub fn update_order_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<Order, PosError> {
        let order = self.order_mut(id)?;
        if order.status == status {
            return Ok(order.clone());
        }
        if order.status.is_terminal() {
            return Err(PosError::Rejected {
                code: "INVALID_STATUS_TRANSITION",
                message: format!("order {id} is {} and cannot become {status}", order.status),
            });
        }
        order.status = status;
        order.updated_at = Some(now);
        if status == OrderStatus::Completed {
            order.completed_at = Some(now);
        }
        Ok(order.clone())
    }

    /// # Errors
    ///
    /// `ORDER_NOT_FOUND`, or `ORDER_NOT_CANCELLABLE` for completed or
    /// refunded orders.
    pub fn cancel_order(
        &mut self,
        id: &OrderId,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Order, PosError> {
        let order = self.order_mut(id)?;
        match order.status {
            OrderStatus::Cancelled => return Ok(order.clone()),
            OrderStatus::Completed | OrderStatus::Refunded => {
                return Err(PosError::Rejected {
                    code: "ORDER_NOT_CANCELLABLE",
                    message: format!("order {id} is {} and cannot be cancelled", order.status),
                });
            }
            _ => {}
        }
        order.status = OrderStatus::Cancelled;
        order.updated_at = Some(now);
        if let Some(reason) = reason {
            order.notes = Some(match order.notes.take() {
                Some(notes) => format!("{notes}\nCancelled: {reason}"),
                None => format!("Cancelled: {reason}"),
            });
        }
        Ok(order.clone())
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// Payments and refunds matching `query`, newest first.
    #[must_use]
    pub fn transactions(&self, query: &TransactionQuery) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| within_range(t.processed_at, query.start, query.end))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| {
            b.processed_at
                .cmp(&a.processed_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        transactions
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect()
    }

    /// Record a payment attempt. Declined attempts are stored as failed
    /// transactions and reported through [`PaymentResult::declined`].
    ///
    /// # Errors
    ///
    /// `ORDER_NOT_FOUND`, `INVALID_REQUEST` for non-positive amounts, or
    /// `ORDER_NOT_PAYABLE` for cancelled orders.
    pub fn record_payment(
        &mut self,
        request: &PaymentRequest,
        approved: bool,
        now: DateTime<Utc>,
    ) -> Result<PaymentResult, PosError> {
        if request.amount <= Decimal::ZERO {
            return Err(PosError::InvalidRequest(format!(
                "payment amount must be positive (got {})",
                request.amount
            )));
        }
        let order = self.order(&request.order_id)?;
        if order.status == OrderStatus::Cancelled {
            return Err(PosError::Rejected {
                code: "ORDER_NOT_PAYABLE",
                message: format!("order {} is cancelled", order.id),
            });
        }

        let transaction = Transaction {
            id: self.next_transaction_id(),
            order_id: order.id,
            amount: request.amount,
            tip: request.tip.unwrap_or(Decimal::ZERO),
            payment_method: request.method,
            status: if approved {
                TransactionStatus::Completed
            } else {
                TransactionStatus::Failed
            },
            processed_at: now,
            card_last4: self.card_last4(request.method),
            reference: None,
            refunded_transaction_id: None,
            refund_reason: None,
        };
        self.transactions.push(transaction.clone());

        Ok(if approved {
            PaymentResult::approved(transaction)
        } else {
            PaymentResult::declined(
                "Payment declined by issuer (simulated)",
                Some("GENERIC_DECLINE".to_string()),
                Some(transaction),
            )
        })
    }

    /// Refund `amount` (default: the remaining balance) of a payment.
    ///
    /// # Errors
    ///
    /// `TRANSACTION_NOT_FOUND`, `TRANSACTION_NOT_REFUNDABLE` for refunds and
    /// unsettled payments, `INVALID_REQUEST` for non-positive amounts, or
    /// `REFUND_EXCEEDS_BALANCE` when `amount` is more than what remains.
    pub fn refund(
        &mut self,
        id: &TransactionId,
        amount: Option<Decimal>,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Transaction, PosError> {
        let original = self
            .transactions
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| PosError::not_found("TRANSACTION", id))?;
        if original.is_refund() || original.status != TransactionStatus::Completed {
            return Err(PosError::Rejected {
                code: "TRANSACTION_NOT_REFUNDABLE",
                message: format!("transaction {id} is not a completed payment"),
            });
        }

        let already_refunded: Decimal = self
            .transactions
            .iter()
            .filter(|t| t.refunded_transaction_id.as_ref() == Some(id))
            .map(|t| t.amount.abs())
            .sum();
        let remaining = original.amount - already_refunded;
        let amount = amount.unwrap_or(remaining);

        if amount <= Decimal::ZERO {
            return Err(PosError::InvalidRequest(format!(
                "refund amount must be positive (got {amount})"
            )));
        }
        if amount > remaining {
            return Err(PosError::Rejected {
                code: "REFUND_EXCEEDS_BALANCE",
                message: format!("refund of {amount} exceeds refundable balance {remaining}"),
            });
        }

        let refund = Transaction {
            id: self.next_transaction_id(),
            order_id: original.order_id.clone(),
            amount: -amount,
            tip: Decimal::ZERO,
            payment_method: original.payment_method,
            status: TransactionStatus::Refunded,
            processed_at: now,
            card_last4: original.card_last4.clone(),
            reference: None,
            refunded_transaction_id: Some(original.id.clone()),
            refund_reason: reason.map(ToString::to_string),
        };
        self.transactions.push(refund.clone());

        if amount == remaining
            && let Ok(order) = self.order_mut(&original.order_id)
        {
            order.status = OrderStatus::Refunded;
            order.updated_at = Some(now);
        }
        Ok(refund)
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Sales over orders created and transactions processed in `[start, end]`.
    #[must_use]
    pub fn sales(&self, start: DateTime<Utc>, end: DateTime<Utc>, period: ReportPeriod) -> SalesData {
        let orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| within_range(o.created_at, Some(start), Some(end)))
            .cloned()
            .collect();
        let transactions: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| within_range(t.processed_at, Some(start), Some(end)))
            .cloned()
            .collect();
        aggregate_sales(period, start, end, &orders, &transactions)
    }

    // =========================================================================
    // Webhooks
    // =========================================================================

    /// # Errors
    ///
    /// `INVALID_REQUEST` for a non-http(s) URL or an empty event list.
    pub fn register_webhook(
        &mut self,
        url: &str,
        events: &[String],
        now: DateTime<Utc>,
    ) -> Result<WebhookRegistration, PosError> {
        validate_webhook(url, events)?;

        self.seq.webhook += 1;
        let registration = WebhookRegistration {
            id: WebhookId::new(format!("wh-{:03}", self.seq.webhook)),
            url: url.to_string(),
            events: events.to_vec(),
            created_at: now,
        };
        self.webhooks.push(registration.clone());
        Ok(registration)
    }

    /// # Errors
    ///
    /// `WEBHOOK_NOT_FOUND` for unknown ids.
    pub fn unregister_webhook(&mut self, id: &WebhookId) -> Result<(), PosError> {
        let before = self.webhooks.len();
        self.webhooks.retain(|w| &w.id != id);
        if self.webhooks.len() == before {
            return Err(PosError::not_found("WEBHOOK", id));
        }
        Ok(())
    }
}

fn validate_menu_fields(name: Option<&str>, price: Option<Decimal>) -> Result<(), PosError> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(PosError::InvalidRequest(
            "menu item name cannot be blank".to_string(),
        ));
    }
    if price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(PosError::InvalidRequest(
            "menu item price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;
    use pos_bridge_core::{NewOrderItem, NewOrderModifier};

    use super::*;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0).unwrap()
    }

    fn store() -> MockStore {
        MockStore::generate(42, anchor())
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = store();
        let b = store();
        assert_eq!(a.orders, b.orders);
        assert_eq!(a.transactions, b.transactions);
        assert_eq!(a.shifts, b.shifts);
    }

    #[test]
    fn test_different_seed_different_orders() {
        let a = store();
        let b = MockStore::generate(7, anchor());
        assert_ne!(a.orders, b.orders);
    }

    #[test]
    fn test_seed_sizes() {
        let s = store();
        assert_eq!(s.menu_items.len(), 12);
        assert_eq!(s.inventory.len(), 10);
        assert_eq!(s.employees.len(), 6);
        assert_eq!(s.orders.len(), ORDER_COUNT);

        let categories: std::collections::BTreeSet<&str> =
            s.menu_items.iter().map(|m| m.category.as_str()).collect();
        assert_eq!(categories.len(), 4);
    }

    #[test]
    fn test_orders_within_window_and_consistent() {
        let s = store();
        let window_start = anchor() - Duration::days(ORDER_WINDOW_DAYS);
        for order in &s.orders {
            assert!(order.created_at >= window_start && order.created_at <= anchor());
            assert!(order.reconcile(Decimal::ZERO).is_empty(), "{}", order.id);
            assert!(!order.items.is_empty());
        }
    }

    #[test]
    fn test_unpaid_statuses_have_no_payments() {
        let s = store();
        for order in s
            .orders
            .iter()
            .filter(|o| matches!(o.status, OrderStatus::Pending | OrderStatus::Cancelled))
        {
            assert!(s.transactions.iter().all(|t| t.order_id != order.id));
        }
    }

    #[test]
    fn test_generated_refunds_link_and_bound() {
        let s = store();
        for refund in s.transactions.iter().filter(|t| t.is_refund()) {
            let original = s
                .transactions
                .iter()
                .find(|t| Some(&t.id) == refund.refunded_transaction_id.as_ref())
                .unwrap();
            assert!(refund.amount < Decimal::ZERO);
            assert_eq!(refund.order_id, original.order_id);
            assert!(refund.amount.abs() <= original.amount);
        }
    }

    #[test]
    fn test_weighted_respects_zero_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(weighted(&mut rng, &[("a", 0), ("b", 5)]), Some("b"));
        }
        assert_eq!(weighted::<&str>(&mut rng, &[]), None);
    }

    #[test]
    fn test_inventory_alerts_seeded() {
        let alerts: Vec<String> = store()
            .inventory
            .iter()
            .filter(|i| i.is_in_alert())
            .map(|i| i.name.clone())
            .collect();
        assert_eq!(
            alerts,
            vec!["Cheddar Cheese", "Salmon Fillets", "Yellow Onions", "Craft Beer Kegs"]
        );
    }

    #[test]
    fn test_create_order_computes_missing_totals() {
        let mut s = store();
        let new = NewOrder {
            items: vec![NewOrderItem {
                menu_item_id: MenuItemId::new("item-001"),
                name: "Classic Burger".to_string(),
                quantity: 2,
                unit_price: cents(1299),
                modifiers: vec![NewOrderModifier {
                    id: None,
                    name: "Bacon".to_string(),
                    price: cents(200),
                }],
                special_instructions: None,
            }],
            ..NewOrder::default()
        };
        let order = s.create_order(&new, anchor()).unwrap();
        assert_eq!(order.subtotal, cents(2798));
        assert_eq!(order.tax, cents(245));
        assert_eq!(order.total, cents(3043));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(s.order(&order.id).unwrap(), order);
    }

    #[test]
    fn test_create_order_keeps_supplied_totals() {
        let mut s = store();
        let new = NewOrder {
            items: vec![NewOrderItem {
                menu_item_id: MenuItemId::new("item-007"),
                name: "French Fries".to_string(),
                quantity: 1,
                unit_price: cents(499),
                modifiers: Vec::new(),
                special_instructions: None,
            }],
            subtotal: Some(cents(499)),
            tax: Some(cents(50)),
            total: Some(cents(600)),
            ..NewOrder::default()
        };
        let order = s.create_order(&new, anchor()).unwrap();
        assert_eq!(order.tax, cents(50));
        assert_eq!(order.total, cents(600));
    }

    #[test]
    fn test_create_order_rejects_unknown_item() {
        let mut s = store();
        let new = NewOrder {
            items: vec![NewOrderItem {
                menu_item_id: MenuItemId::new("item-999"),
                name: "Ghost".to_string(),
                quantity: 1,
                unit_price: cents(100),
                modifiers: Vec::new(),
                special_instructions: None,
            }],
            ..NewOrder::default()
        };
        assert!(matches!(
            s.create_order(&new, anchor()),
            Err(PosError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_shift_lifecycle() {
        let mut s = store();
        let employee = EmployeeId::new("emp-002");
        let shift = s.start_shift(&employee, anchor()).unwrap();
        assert!(shift.is_open());

        let again = s.start_shift(&employee, anchor()).unwrap_err();
        assert!(matches!(again, PosError::Rejected { code: "SHIFT_ALREADY_ACTIVE", .. }));

        let closed = s.end_shift(&shift.id, anchor() + Duration::hours(8)).unwrap();
        assert_eq!(closed.hours_worked, Some(Decimal::from(8)));
        assert_eq!(closed.total_pay, Some(cents(12400)));

        let twice = s.end_shift(&shift.id, anchor() + Duration::hours(9)).unwrap_err();
        assert!(matches!(twice, PosError::Rejected { code: "SHIFT_NOT_ACTIVE", .. }));
    }

    #[test]
    fn test_inactive_employee_cannot_clock_in() {
        let mut s = store();
        let err = s.start_shift(&EmployeeId::new("emp-006"), anchor()).unwrap_err();
        assert!(matches!(err, PosError::Rejected { code: "EMPLOYEE_INACTIVE", .. }));
    }

    #[test]
    fn test_partial_then_full_refund() {
        let mut s = store();
        let payment = s
            .transactions
            .iter()
            .find(|t| {
                t.status == TransactionStatus::Completed
                    && !s.transactions.iter().any(|r| r.refunded_transaction_id.as_ref() == Some(&t.id))
            })
            .cloned()
            .unwrap();

        let partial = s.refund(&payment.id, Some(cents(100)), Some("cold food"), anchor()).unwrap();
        assert_eq!(partial.amount, -cents(100));
        assert_eq!(partial.order_id, payment.order_id);

        let too_much = s
            .refund(&payment.id, Some(payment.amount), None, anchor())
            .unwrap_err();
        assert!(matches!(too_much, PosError::Rejected { code: "REFUND_EXCEEDS_BALANCE", .. }));

        let rest = s.refund(&payment.id, None, None, anchor()).unwrap();
        assert_eq!(rest.amount, -(payment.amount - cents(100)));
        assert_eq!(s.order(&payment.order_id).unwrap().status, OrderStatus::Refunded);

        let refund_of_refund = s.refund(&rest.id, None, None, anchor()).unwrap_err();
        assert!(matches!(
            refund_of_refund,
            PosError::Rejected { code: "TRANSACTION_NOT_REFUNDABLE", .. }
        ));
    }

    #[test]
    fn test_cancel_completed_order_rejected() {
        let mut s = store();
        let completed = s
            .orders
            .iter()
            .find(|o| o.status == OrderStatus::Completed)
            .map(|o| o.id.clone())
            .unwrap();
        let err = s.cancel_order(&completed, None, anchor()).unwrap_err();
        assert!(matches!(err, PosError::Rejected { code: "ORDER_NOT_CANCELLABLE", .. }));
    }

    #[test]
    fn test_transactions_paging() {
        let s = store();
        let all = s.transactions(&TransactionQuery {
            limit: 1000,
            ..TransactionQuery::default()
        });
        let page = s.transactions(&TransactionQuery {
            limit: 5,
            offset: 5,
            ..TransactionQuery::default()
        });
        assert_eq!(page.len(), 5);
        assert_eq!(page[0], all[5]);
        assert!(all.windows(2).all(|w| w[0].processed_at >= w[1].processed_at));
    }

    #[test]
    fn test_sales_revenue_matches_transactions() {
        let s = store();
        let start = anchor() - Duration::days(ORDER_WINDOW_DAYS + 1);
        let sales = s.sales(start, anchor(), ReportPeriod::Month);
        let expected: Decimal = s.transactions.iter().map(|t| t.amount).sum();
        assert_eq!(sales.total_revenue, expected);
        assert_eq!(sales.total_orders, ORDER_COUNT);
    }
}
