//! Canonical status enums and vendor status mapping tables.
//!
//! Every vendor adapter translates its own status literals into these enums
//! through a [`StatusMap`]. Maps are explicit tables so they can be
//! enumerated in tests, and total: an unrecognized literal resolves to the
//! map's documented fallback instead of failing.

use serde::{Deserialize, Serialize};

/// Error returned when text does not name a variant of a canonical enum.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    #[must_use]
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Canonical order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Received but not yet accepted. Fallback for unknown vendor states.
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// All variants, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::Completed,
        Self::Cancelled,
        Self::Refunded,
    ];

    /// Whether the order can no longer change state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Refunded)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Preparing => write!(f, "preparing"),
            Self::Ready => write!(f, "ready"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Refunded => write!(f, "refunded"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.to_string() == s)
            .ok_or_else(|| ParseEnumError::new("order status", s))
    }
}

/// How the order is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    DineIn,
    Takeout,
    Delivery,
    Pickup,
}

/// Canonical payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Mobile,
    GiftCard,
    Other,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Card => write!(f, "card"),
            Self::Mobile => write!(f, "mobile"),
            Self::GiftCard => write!(f, "gift_card"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Canonical transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Completed,
    Failed,
    /// Fallback for unknown vendor states.
    #[default]
    Pending,
    Refunded,
}

impl TransactionStatus {
    /// Whether the transaction contributes to revenue.
    ///
    /// Refund records carry negative amounts and are counted so that revenue
    /// is net of refunds.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Completed | Self::Refunded)
    }
}

/// Shift lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Scheduled,
    #[default]
    Active,
    Completed,
    Cancelled,
}

/// Granularity requested for a sales report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl ReportPeriod {
    /// Whether reports for this period include an hour-by-hour breakdown.
    #[must_use]
    pub const fn includes_hourly_breakdown(self) -> bool {
        matches!(self, Self::Hour | Self::Day)
    }
}

impl std::str::FromStr for ReportPeriod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(ParseEnumError::new("report period", s)),
        }
    }
}

// =============================================================================
// Vendor mapping tables
// =============================================================================

/// An explicit, total mapping from vendor status literals to a canonical value.
///
/// Lookups are case-insensitive. Each literal appears once, so every known
/// literal resolves to exactly one canonical value; anything else resolves
/// to `fallback`.
#[derive(Debug)]
pub struct StatusMap<T: 'static> {
    entries: &'static [(&'static str, T)],
    fallback: T,
}

impl<T: Copy + PartialEq> StatusMap<T> {
    /// Build a map from a static table and a fallback value.
    #[must_use]
    pub const fn new(entries: &'static [(&'static str, T)], fallback: T) -> Self {
        Self { entries, fallback }
    }

    /// Resolve a vendor literal, falling back for unknown values.
    #[must_use]
    pub fn resolve(&self, literal: &str) -> T {
        self.lookup(literal).unwrap_or(self.fallback)
    }

    /// Resolve a vendor literal, returning `None` for unknown values.
    #[must_use]
    pub fn lookup(&self, literal: &str) -> Option<T> {
        self.entries
            .iter()
            .find(|(vendor, _)| vendor.eq_ignore_ascii_case(literal))
            .map(|(_, canonical)| *canonical)
    }

    /// First vendor literal that maps to `canonical`, for outbound requests.
    #[must_use]
    pub fn vendor_literal(&self, canonical: T) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, value)| *value == canonical)
            .map(|(vendor, _)| *vendor)
    }

    /// Value used for literals not present in the table.
    #[must_use]
    pub const fn fallback(&self) -> T {
        self.fallback
    }

    /// All table entries.
    #[must_use]
    pub const fn entries(&self) -> &'static [(&'static str, T)] {
        self.entries
    }

    /// First literal listed more than once, ignoring case.
    ///
    /// `lookup` is first-match, so a repeated literal shadows its later entry.
    #[must_use]
    pub fn duplicate_literal(&self) -> Option<&'static str> {
        self.entries.iter().enumerate().find_map(|(i, (literal, _))| {
            self.entries
                .iter()
                .skip(i + 1)
                .any(|(other, _)| other.eq_ignore_ascii_case(literal))
                .then_some(*literal)
        })
    }
}
