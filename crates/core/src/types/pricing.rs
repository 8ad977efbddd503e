//! Letter-count pricing tiers.
//!
//! A custom sign is priced by how many letters it carries, not per letter:
//! the table maps a maximum letter count to a flat price. Tiers are checked
//! in ascending order and the first tier whose bound covers the count wins;
//! anything beyond the largest bound is charged at the largest tier (the
//! configurator caps input at 10 characters, so that branch is a safety
//! net, not an expected path).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Money;

/// One pricing tier: a flat price for signs up to `max_letters` letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterTier {
    /// Largest letter count this tier covers.
    pub max_letters: usize,
    /// Flat price in euros.
    pub price: i64,
}

/// The fixed tier table, ascending by letter count.
pub const PRICE_TIERS: [LetterTier; 5] = [
    LetterTier {
        max_letters: 4,
        price: 63,
    },
    LetterTier {
        max_letters: 5,
        price: 72,
    },
    LetterTier {
        max_letters: 6,
        price: 81,
    },
    LetterTier {
        max_letters: 8,
        price: 90,
    },
    LetterTier {
        max_letters: 10,
        price: 108,
    },
];

/// Price for a sign with the given letter count.
///
/// Pure lookup: the smallest tier whose bound is >= `letter_count`, falling
/// back to the largest tier for counts above every bound.
#[must_use]
pub fn price_for_letter_count(letter_count: usize) -> Money {
    let tier = PRICE_TIERS
        .iter()
        .find(|t| letter_count <= t.max_letters)
        .unwrap_or(&PRICE_TIERS[PRICE_TIERS.len() - 1]);

    Money::eur(Decimal::from(tier.price))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(n: usize) -> i64 {
        let money = price_for_letter_count(n);
        assert_eq!(money.currency.code(), "EUR");
        i64::try_from(money.amount.mantissa()).unwrap()
    }

    #[test]
    fn test_every_count_maps_to_smallest_covering_tier() {
        // Exhaustive over the supported input range
        let expected = [63, 63, 63, 63, 63, 72, 81, 90, 90, 108, 108];
        for (n, want) in expected.iter().enumerate() {
            assert_eq!(price(n), *want, "letter count {n}");
        }
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(price(4), 63);
        assert_eq!(price(5), 72);
        assert_eq!(price(7), 90);
        assert_eq!(price(10), 108);
    }

    #[test]
    fn test_counts_above_largest_bound_use_largest_tier() {
        assert_eq!(price(11), 108);
        assert_eq!(price(100), 108);
    }

    #[test]
    fn test_tiers_are_ascending() {
        for pair in PRICE_TIERS.windows(2) {
            assert!(pair[0].max_letters < pair[1].max_letters);
            assert!(pair[0].price < pair[1].price);
        }
    }
}
