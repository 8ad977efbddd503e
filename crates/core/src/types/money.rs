//! Currency amounts using decimal arithmetic.
//!
//! All amounts are carried in the currency's standard unit (euros, not
//! cents) as a [`Decimal`]. Conversion to minor units happens exactly once,
//! at the payment-provider boundary, via [`Money::minor_units`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., euros, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Create a euro amount.
    #[must_use]
    pub const fn eur(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::Eur)
    }

    /// A zero euro amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self::eur(Decimal::ZERO)
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Whether the amount is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Convert to the currency's minor unit (cents).
    ///
    /// Multiplies by 100 and rounds halves away from zero, matching what the
    /// payment provider expects for an integer amount. Returns `None` if the
    /// result does not fit in an `i64`.
    #[must_use]
    pub fn minor_units(&self) -> Option<i64> {
        (self.amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency.code())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    /// Euro - the shop's trading currency.
    #[default]
    Eur,
    Usd,
    Gbp,
}

impl CurrencyCode {
    /// The ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units_whole_amount() {
        let m = Money::eur(Decimal::new(6300, 2)); // 63.00
        assert_eq!(m.minor_units(), Some(6300));
    }

    #[test]
    fn test_minor_units_rounds_half_away_from_zero() {
        assert_eq!(Money::eur(Decimal::new(1005, 3)).minor_units(), Some(101)); // 1.005
        assert_eq!(Money::eur(Decimal::new(1004, 3)).minor_units(), Some(100)); // 1.004
    }

    #[test]
    fn test_zero() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_positive());
        assert!(Money::eur(Decimal::new(1, 2)).is_positive());
    }

    #[test]
    fn test_display() {
        let m = Money::eur(Decimal::from(108));
        assert_eq!(m.to_string(), "108.00 EUR");
    }

    #[test]
    fn test_currency_serde() {
        let json = serde_json::to_string(&CurrencyCode::Eur).unwrap();
        assert_eq!(json, "\"EUR\"");
    }
}
