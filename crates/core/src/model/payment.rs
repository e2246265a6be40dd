//! Payment and transaction records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::CustomerInfo;
use crate::types::{OrderId, PaymentMethod, TransactionId, TransactionStatus};

/// A payment or refund against an order.
///
/// `amount` is signed: refunds are negative and reference the refunded
/// transaction through `refunded_transaction_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub order_id: OrderId,
    pub amount: Decimal,
    #[serde(default)]
    pub tip: Decimal,
    pub payment_method: PaymentMethod,
    pub status: TransactionStatus,
    pub processed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_last4: Option<String>,
    /// Vendor-side reference (receipt number, processor id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refunded_transaction_id: Option<TransactionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_reason: Option<String>,
}

impl Transaction {
    /// Whether this record is a refund of another transaction.
    #[must_use]
    pub const fn is_refund(&self) -> bool {
        self.refunded_transaction_id.is_some()
    }
}

/// Input for charging an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[serde(default)]
    pub tip: Option<Decimal>,
    #[serde(default)]
    pub customer: Option<CustomerInfo>,
}

/// Business outcome of a payment attempt.
///
/// A declined payment is a successful call: the envelope reports success
/// and this record reports `success: false` with the decline reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Vendor decline code, when the vendor supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decline_code: Option<String>,
}

impl PaymentResult {
    /// An approved payment.
    #[must_use]
    pub const fn approved(transaction: Transaction) -> Self {
        Self {
            success: true,
            transaction: Some(transaction),
            error: None,
            decline_code: None,
        }
    }

    /// A declined payment, optionally with the failed transaction record.
    #[must_use]
    pub fn declined(
        message: impl Into<String>,
        decline_code: Option<String>,
        transaction: Option<Transaction>,
    ) -> Self {
        Self {
            success: false,
            transaction,
            error: Some(message.into()),
            decline_code,
        }
    }
}
