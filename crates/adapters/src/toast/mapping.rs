//! Toast status literals to canonical values.
//!
//! Fallbacks: order statuses (approval, fulfillment, check payment) and
//! transaction statuses fall back to `Pending`, payment types to `Other`,
//! dining behaviors to `DineIn`.

use pos_bridge_core::{OrderStatus, OrderType, PaymentMethod, StatusMap, TransactionStatus};

/// `Order.approvalStatus`. Approved orders defer to their selections.
pub static APPROVAL_STATUS: StatusMap<OrderStatus> = StatusMap::new(
    &[
        ("NEEDS_APPROVAL", OrderStatus::Pending),
        ("FUTURE", OrderStatus::Pending),
        ("NOT_APPROVED", OrderStatus::Pending),
        ("APPROVED", OrderStatus::Confirmed),
    ],
    OrderStatus::Pending,
);

/// `Selection.fulfillmentStatus`.
pub static FULFILLMENT_STATUS: StatusMap<OrderStatus> = StatusMap::new(
    &[
        ("NEW", OrderStatus::Confirmed),
        ("HOLD", OrderStatus::Confirmed),
        ("SENT", OrderStatus::Preparing),
        ("READY", OrderStatus::Ready),
    ],
    OrderStatus::Pending,
);

/// `Check.paymentStatus`. Only closed checks settle the order.
pub static CHECK_PAYMENT_STATUS: StatusMap<OrderStatus> = StatusMap::new(
    &[
        ("OPEN", OrderStatus::Confirmed),
        ("PAID", OrderStatus::Confirmed),
        ("CLOSED", OrderStatus::Completed),
    ],
    OrderStatus::Pending,
);

/// `Payment.paymentStatus`.
pub static PAYMENT_STATUS: StatusMap<TransactionStatus> = StatusMap::new(
    &[
        ("OPEN", TransactionStatus::Pending),
        ("PROCESSING", TransactionStatus::Pending),
        ("AUTHORIZED", TransactionStatus::Pending),
        ("CAPTURE_IN_PROGRESS", TransactionStatus::Pending),
        ("CAPTURED", TransactionStatus::Completed),
        ("DENIED", TransactionStatus::Failed),
        ("VOIDED", TransactionStatus::Failed),
        ("CANCELLED", TransactionStatus::Failed),
    ],
    TransactionStatus::Pending,
);

/// `Payment.type`.
pub static PAYMENT_TYPE: StatusMap<PaymentMethod> = StatusMap::new(
    &[
        ("CASH", PaymentMethod::Cash),
        ("CREDIT", PaymentMethod::Card),
        ("GIFTCARD", PaymentMethod::GiftCard),
        ("LEVELUP", PaymentMethod::Mobile),
        ("HOUSE_ACCOUNT", PaymentMethod::Other),
        ("REWARDCARD", PaymentMethod::Other),
        ("OTHER", PaymentMethod::Other),
        ("UNDETERMINED", PaymentMethod::Other),
    ],
    PaymentMethod::Other,
);

/// `Payment.refundStatus`. `NONE` means no refund record is emitted.
pub static REFUND_STATUS: StatusMap<TransactionStatus> = StatusMap::new(
    &[
        ("PARTIAL", TransactionStatus::Refunded),
        ("FULL", TransactionStatus::Refunded),
    ],
    TransactionStatus::Pending,
);

/// `DiningOption.behavior`.
pub static DINING_BEHAVIOR: StatusMap<OrderType> = StatusMap::new(
    &[
        ("DINE_IN", OrderType::DineIn),
        ("TAKE_OUT", OrderType::Takeout),
        ("DELIVERY", OrderType::Delivery),
        ("CURBSIDE", OrderType::Pickup),
    ],
    OrderType::DineIn,
);

/// Stock status of an item whose quantity Toast tracks.
pub const STOCK_QUANTITY: &str = "QUANTITY";

/// Stock status of an item that cannot be sold.
pub const STOCK_OUT: &str = "OUT_OF_STOCK";

/// Stock status of an item without a tracked quantity.
pub const STOCK_IN: &str = "IN_STOCK";

/// Whether a refund status literal means money went back to the guest.
#[must_use]
pub fn is_refunded(refund_status: Option<&str>) -> bool {
    refund_status.is_some_and(|s| REFUND_STATUS.lookup(s).is_some())
}

/// Furthest-behind stage across selection fulfillment statuses.
///
/// An order is only as ready as its slowest line.
#[must_use]
pub fn kitchen_status<'a>(statuses: impl IntoIterator<Item = &'a str>) -> Option<OrderStatus> {
    statuses
        .into_iter()
        .map(|s| FULFILLMENT_STATUS.resolve(s))
        .min_by_key(|status| match status {
            OrderStatus::Pending => 0,
            OrderStatus::Confirmed => 1,
            OrderStatus::Preparing => 2,
            _ => 3,
        })
}
