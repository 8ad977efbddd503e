//! Catalog route handler: everything the configurator needs in one call.

use axum::Json;
use serde::Serialize;
use tracing::instrument;

use neon_pulse_core::{LetterTier, PRICE_TIERS, SignColor, SignFont, SignText};

use crate::catalog::{Product, products};

/// A font option for the configurator.
#[derive(Debug, Serialize)]
pub struct FontView {
    pub id: SignFont,
    pub name: &'static str,
}

/// A color option for the configurator.
#[derive(Debug, Serialize)]
pub struct ColorView {
    pub id: SignColor,
    pub hex: &'static str,
    pub glow: &'static str,
}

/// The full catalog response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub products: Vec<Product>,
    pub fonts: Vec<FontView>,
    pub colors: Vec<ColorView>,
    pub tiers: Vec<LetterTier>,
    pub max_letters: usize,
}

/// Serve the catalog.
#[instrument]
pub async fn show() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        products: products(),
        fonts: SignFont::ALL
            .into_iter()
            .map(|font| FontView {
                id: font,
                name: font.display_name(),
            })
            .collect(),
        colors: SignColor::ALL
            .into_iter()
            .map(|color| ColorView {
                id: color,
                hex: color.hex(),
                glow: color.glow(),
            })
            .collect(),
        tiers: PRICE_TIERS.to_vec(),
        max_letters: SignText::MAX_LENGTH,
    })
}
