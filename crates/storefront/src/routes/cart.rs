//! Cart route handlers.
//!
//! The cart lives in the cookie session and nowhere else. Every mutation
//! loads it, applies one operation, and stores it back; handlers respond
//! with the full cart so the SPA can re-render without a second round trip.

use axum::{
    Json,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use neon_pulse_core::{
    Cart, CartItem, Customization, Money, ProductId, SignColor, SignFont, SignText,
};

use crate::error::{AppError, Result};
use crate::models::session_keys;

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, defaulting to empty.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Store the cart back into the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

// =============================================================================
// Request / Response shapes
// =============================================================================

/// Customization as submitted by the configurator.
///
/// The letter count is derived server-side from the text; the client does
/// not get to price its own sign.
#[derive(Debug, Deserialize)]
pub struct CustomizationForm {
    pub text: String,
    pub font: SignFont,
    pub color: SignColor,
}

impl CustomizationForm {
    fn into_customization(self) -> Result<Customization> {
        let text = SignText::parse(&self.text).map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(Customization {
            text,
            font: self.font,
            color: self.color,
        })
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    pub customization: Option<CustomizationForm>,
}

/// One cart line as served to the SPA.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    /// Position in the cart; removal is by this index.
    pub index: usize,
    pub product_id: ProductId,
    pub quantity: u32,
    pub customization: Option<Customization>,
    pub unit_price: Money,
    pub line_total: Money,
}

/// The cart as served to the SPA.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItemView>,
    pub total: Money,
    pub count: usize,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| CartItemView {
                    index,
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                    customization: item.customization.clone(),
                    unit_price: item.unit_price(),
                    line_total: item.line_total(),
                })
                .collect(),
            total: cart.total(),
            count: cart.len(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartResponse>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartResponse::from(&cart)))
}

/// Append a line item.
///
/// Every add is a distinct line, even for an identical configuration - the
/// cart never merges quantities.
#[instrument(skip(session, request))]
pub async fn add_item(
    session: Session,
    Json(request): Json<AddItemRequest>,
) -> Result<Response> {
    if request.quantity == 0 {
        return Err(AppError::BadRequest("quantity must be positive".to_owned()));
    }

    let customization = request
        .customization
        .map(CustomizationForm::into_customization)
        .transpose()?;

    let mut cart = load_cart(&session).await?;
    cart.add(CartItem {
        product_id: request.product_id,
        quantity: request.quantity,
        customization,
    });
    save_cart(&session, &cart).await?;

    Ok((StatusCode::CREATED, Json(CartResponse::from(&cart))).into_response())
}

/// Remove the line at `index`.
///
/// Out-of-range indices are a no-op: the cart is returned unchanged rather
/// than erroring, since the SPA may race its own removals.
#[instrument(skip(session))]
pub async fn remove_item(
    session: Session,
    Path(index): Path<usize>,
) -> Result<Json<CartResponse>> {
    let mut cart = load_cart(&session).await?;

    if cart.remove(index).is_some() {
        save_cart(&session, &cart).await?;
    }

    Ok(Json(CartResponse::from(&cart)))
}

/// Clear the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<StatusCode> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(StatusCode::NO_CONTENT)
}
