//! The product catalog.
//!
//! One configurable product today; the shape leaves room for more. The
//! catalog is code, not a table: products change with the workshop's
//! capabilities, which change with deployments anyway.

use serde::Serialize;

use neon_pulse_core::{Money, ProductId, price_for_letter_count};

/// A catalog product, as served to the configurator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Entry price (smallest tier).
    pub price_from: Money,
    pub features: Vec<String>,
}

/// Handle of the configurable sign product.
pub const CUSTOM_SIGN_HANDLE: &str = "neon-custom";

/// All products, in display order.
#[must_use]
pub fn products() -> Vec<Product> {
    vec![Product {
        id: ProductId::from(CUSTOM_SIGN_HANDLE),
        name: "Néon personnalisé".to_owned(),
        description: "Votre texte en néon LED, fabriqué à la main. \
                      Choisissez le texte, la police et la couleur."
            .to_owned(),
        price_from: price_for_letter_count(1),
        features: vec![
            "Jusqu'à 10 caractères".to_owned(),
            "5 polices, 7 couleurs".to_owned(),
            "Variateur et télécommande inclus".to_owned(),
            "Garantie 2 ans".to_owned(),
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_catalog_has_the_custom_sign() {
        let products = products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id.as_str(), CUSTOM_SIGN_HANDLE);
    }

    #[test]
    fn test_price_from_is_smallest_tier() {
        let products = products();
        assert_eq!(products[0].price_from.amount, Decimal::from(63));
    }
}
