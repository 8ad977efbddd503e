//! The session cart.
//!
//! An ordered list of line items held in the visitor's cookie session for
//! the lifetime of that session - there is deliberately no persistence
//! layer behind it. Mutation is always through the session extractor, one
//! request at a time, so the type itself needs no synchronization.

use serde::{Deserialize, Serialize};

use super::customization::Customization;
use super::id::ProductId;
use super::money::Money;
use super::pricing::price_for_letter_count;

/// One line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Catalog product handle.
    pub product_id: ProductId,
    /// How many of this line (positive).
    pub quantity: u32,
    /// Sign configuration, when the product is customizable.
    pub customization: Option<Customization>,
}

impl CartItem {
    /// Unit price of this line.
    ///
    /// Customized signs are priced by letter count; a line without a
    /// customization carries no configurator price and contributes zero.
    #[must_use]
    pub fn unit_price(&self) -> Money {
        self.customization
            .as_ref()
            .map_or_else(Money::zero, |c| price_for_letter_count(c.letter_count()))
    }

    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        let unit = self.unit_price();
        Money::new(
            unit.amount * rust_decimal::Decimal::from(self.quantity),
            unit.currency,
        )
    }
}

/// The cart: an append-only ordered list with positional removal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of lines (not unit quantities).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a line item.
    ///
    /// Every add is a distinct line: two identical configurations become
    /// two entries, never one entry with a merged quantity.
    pub fn add(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Remove the line at `index`, preserving the order of the rest.
    ///
    /// Out-of-range indices are a no-op and return `None`.
    pub fn remove(&mut self, index: usize) -> Option<CartItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(), |acc, item| {
                Money::new(acc.amount + item.line_total().amount, acc.currency)
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::customization::{SignColor, SignFont, SignText};
    use rust_decimal::Decimal;

    fn custom_item(text: &str, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::from("neon-custom"),
            quantity,
            customization: Some(Customization {
                text: SignText::parse(text).unwrap(),
                font: SignFont::Roboto,
                color: SignColor::Blue,
            }),
        }
    }

    #[test]
    fn test_identical_adds_stay_distinct_lines() {
        let mut cart = Cart::new();
        cart.add(custom_item("Neon", 1));
        cart.add(custom_item("Neon", 1));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[0], cart.items()[1]);
    }

    #[test]
    fn test_remove_preserves_order_of_rest() {
        let mut cart = Cart::new();
        cart.add(custom_item("One", 1));
        cart.add(custom_item("Two", 1));
        cart.add(custom_item("Three", 1));

        let removed = cart.remove(1);
        assert_eq!(removed.unwrap().customization.unwrap().text.as_str(), "Two");

        assert_eq!(cart.len(), 2);
        assert_eq!(
            cart.items()[0].customization.as_ref().unwrap().text.as_str(),
            "One"
        );
        assert_eq!(
            cart.items()[1].customization.as_ref().unwrap().text.as_str(),
            "Three"
        );
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut cart = Cart::new();
        cart.add(custom_item("Neon", 1));

        assert!(cart.remove(5).is_none());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_clear_empties() {
        let mut cart = Cart::new();
        cart.add(custom_item("Neon", 1));
        cart.add(custom_item("Sign", 2));

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.total().is_zero());
    }

    #[test]
    fn test_total_sums_tier_price_times_quantity() {
        let mut cart = Cart::new();
        // 4 letters -> 63, x2
        cart.add(custom_item("Neon", 2));
        // 7 letters -> 90 (tier bound 8), x1
        cart.add(custom_item("Bonjour", 1));

        assert_eq!(cart.total().amount, Decimal::from(63 * 2 + 90));
    }

    #[test]
    fn test_uncustomized_line_contributes_zero() {
        let mut cart = Cart::new();
        cart.add(CartItem {
            product_id: ProductId::from("gift-card"),
            quantity: 3,
            customization: None,
        });

        assert!(cart.total().is_zero());
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert!(Cart::new().total().is_zero());
    }
}
