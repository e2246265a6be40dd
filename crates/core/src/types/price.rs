//! Decimal money helpers.
//!
//! Canonical records carry prices as a plain [`Decimal`] in the adapter's
//! reporting currency. Vendors disagree on the wire format: Square sends
//! integer minor units (`1099` cents), Toast sends decimal major units
//! (`10.99`). These helpers convert between the two without floating point.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the integrated vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    JPY,
}

impl CurrencyCode {
    /// Number of decimal places in the currency's minor unit.
    #[must_use]
    pub const fn minor_unit_scale(self) -> u32 {
        match self {
            Self::JPY => 0,
            Self::USD | Self::EUR | Self::GBP | Self::CAD | Self::AUD => 2,
        }
    }

    /// ISO code as sent on the wire.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::JPY => "JPY",
        }
    }

    /// Parse an ISO code, returning `None` for unsupported currencies.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            "CAD" => Some(Self::CAD),
            "AUD" => Some(Self::AUD),
            "JPY" => Some(Self::JPY),
            _ => None,
        }
    }
}

/// Convert an integer amount of minor units (e.g. cents) to a decimal amount.
#[must_use]
pub fn from_minor_units(amount: i64, currency: CurrencyCode) -> Decimal {
    Decimal::new(amount, currency.minor_unit_scale())
}

/// Convert a decimal amount to integer minor units, rounding half away from zero.
///
/// Returns `None` if the amount does not fit in an `i64`.
#[must_use]
pub fn to_minor_units(amount: Decimal, currency: CurrencyCode) -> Option<i64> {
    let scaled = round_money(amount, currency)
        .checked_mul(Decimal::from(10_i64.pow(currency.minor_unit_scale())))?;
    i64::try_from(scaled.trunc()).ok()
}

/// Round an amount to the currency's minor unit.
#[must_use]
pub fn round_money(amount: Decimal, currency: CurrencyCode) -> Decimal {
    amount.round_dp_with_strategy(
        currency.minor_unit_scale(),
        RoundingStrategy::MidpointAwayFromZero,
    )
}
