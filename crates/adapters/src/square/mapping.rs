//! Square status literals to canonical values.
//!
//! Fallbacks: order and transaction statuses fall back to `Pending`, payment
//! sources to `Other`, fulfillment types to `Takeout`, shift statuses to
//! `Active`.

use pos_bridge_core::{
    OrderStatus, OrderType, PaymentMethod, ShiftStatus, StatusMap, TransactionStatus,
};

/// `Order.state`.
pub static ORDER_STATE: StatusMap<OrderStatus> = StatusMap::new(
    &[
        ("DRAFT", OrderStatus::Pending),
        ("OPEN", OrderStatus::Confirmed),
        ("COMPLETED", OrderStatus::Completed),
        ("CANCELED", OrderStatus::Cancelled),
    ],
    OrderStatus::Pending,
);

/// `Fulfillment.state`, consulted while an order is `OPEN`.
pub static FULFILLMENT_STATE: StatusMap<OrderStatus> = StatusMap::new(
    &[
        ("PROPOSED", OrderStatus::Confirmed),
        ("RESERVED", OrderStatus::Preparing),
        ("PREPARED", OrderStatus::Ready),
        ("COMPLETED", OrderStatus::Completed),
        ("CANCELED", OrderStatus::Cancelled),
        ("FAILED", OrderStatus::Cancelled),
    ],
    OrderStatus::Pending,
);

/// `Payment.status`.
pub static PAYMENT_STATUS: StatusMap<TransactionStatus> = StatusMap::new(
    &[
        ("APPROVED", TransactionStatus::Pending),
        ("PENDING", TransactionStatus::Pending),
        ("COMPLETED", TransactionStatus::Completed),
        ("CANCELED", TransactionStatus::Failed),
        ("FAILED", TransactionStatus::Failed),
    ],
    TransactionStatus::Pending,
);

/// `PaymentRefund.status`.
pub static REFUND_STATUS: StatusMap<TransactionStatus> = StatusMap::new(
    &[
        ("PENDING", TransactionStatus::Pending),
        ("COMPLETED", TransactionStatus::Refunded),
        ("REJECTED", TransactionStatus::Failed),
        ("FAILED", TransactionStatus::Failed),
    ],
    TransactionStatus::Pending,
);

/// `Payment.source_type`.
pub static SOURCE_TYPE: StatusMap<PaymentMethod> = StatusMap::new(
    &[
        ("CARD", PaymentMethod::Card),
        ("CASH", PaymentMethod::Cash),
        ("WALLET", PaymentMethod::Mobile),
        ("SQUARE_ACCOUNT", PaymentMethod::Mobile),
        ("BANK_ACCOUNT", PaymentMethod::Other),
        ("BUY_NOW_PAY_LATER", PaymentMethod::Other),
        ("EXTERNAL", PaymentMethod::Other),
    ],
    PaymentMethod::Other,
);

/// Card brand Square reports for its own gift cards.
pub const GIFT_CARD_BRAND: &str = "SQUARE_GIFT_CARD";

/// `Fulfillment.type`. Orders without fulfillments are dine-in.
pub static FULFILLMENT_TYPE: StatusMap<OrderType> = StatusMap::new(
    &[
        ("PICKUP", OrderType::Pickup),
        ("DELIVERY", OrderType::Delivery),
        ("SHIPMENT", OrderType::Delivery),
    ],
    OrderType::Takeout,
);

/// `Shift.status`.
pub static SHIFT_STATUS: StatusMap<ShiftStatus> = StatusMap::new(
    &[("OPEN", ShiftStatus::Active), ("CLOSED", ShiftStatus::Completed)],
    ShiftStatus::Active,
);

/// Payment method for a Square payment, distinguishing gift cards by brand.
#[must_use]
pub fn payment_method(source_type: Option<&str>, card_brand: Option<&str>) -> PaymentMethod {
    if card_brand == Some(GIFT_CARD_BRAND) {
        return PaymentMethod::GiftCard;
    }
    source_type.map_or(SOURCE_TYPE.fallback(), |s| SOURCE_TYPE.resolve(s))
}

/// Canonical status of an order from its state and first fulfillment.
#[must_use]
pub fn order_status(state: Option<&str>, fulfillment_state: Option<&str>) -> OrderStatus {
    let state = state.map_or(ORDER_STATE.fallback(), |s| ORDER_STATE.resolve(s));
    match (state, fulfillment_state) {
        (OrderStatus::Confirmed, Some(fulfillment)) => FULFILLMENT_STATE.resolve(fulfillment),
        (status, _) => status,
    }
}

/// `Order.state` and `Fulfillment.state` that put an order in `status`.
///
/// Returns `None` for statuses Square orders cannot be moved into.
#[must_use]
pub fn outbound_states(status: OrderStatus) -> Option<(&'static str, Option<&'static str>)> {
    match status {
        OrderStatus::Pending | OrderStatus::Refunded => None,
        OrderStatus::Confirmed | OrderStatus::Preparing | OrderStatus::Ready => {
            Some(("OPEN", FULFILLMENT_STATE.vendor_literal(status)))
        }
        OrderStatus::Completed => Some(("COMPLETED", Some("COMPLETED"))),
        OrderStatus::Cancelled => Some(("CANCELED", Some("CANCELED"))),
    }
}

/// `Order.state` to search for orders that may be in `status`.
#[must_use]
pub fn search_state(status: OrderStatus) -> &'static str {
    outbound_states(status).map_or_else(
        || ORDER_STATE.vendor_literal(status).unwrap_or("COMPLETED"),
        |(state, _)| state,
    )
}

/// `ExternalPaymentDetails.type` for payments recorded outside Square.
#[must_use]
pub const fn external_payment_type(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Card => "CARD",
        PaymentMethod::GiftCard => "OTHER_GIFT_CARD",
        PaymentMethod::Mobile => "EMONEY",
        PaymentMethod::Cash | PaymentMethod::Other => "OTHER",
    }
}
