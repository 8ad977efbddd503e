//! Checkout relay: forward a checkout total to the payment API.
//!
//! A thin, stateless pass-through: convert the amount to minor units,
//! create the payment intent, hand the client secret back. No retries and
//! no idempotency keys - a failure is terminal for the attempt and the
//! customer retries from the SPA.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use neon_pulse_core::{Money, OrderId};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Relay request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    /// Checkout total in euros (standard unit, e.g. 63.00).
    pub amount: Decimal,
    /// The order this payment funds; forwarded as metadata.
    pub order_id: OrderId,
}

/// Relay response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
}

/// Create a payment intent for a checkout total.
#[instrument(skip(state, request), fields(order_id = %request.order_id))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentIntentRequest>,
) -> Result<Json<CreatePaymentIntentResponse>> {
    let total = Money::eur(request.amount);

    // A zero or negative amount never reaches the payment API
    if !total.is_positive() {
        return Err(AppError::BadRequest("amount must be positive".to_owned()));
    }

    let amount_minor = total
        .minor_units()
        .ok_or_else(|| AppError::BadRequest("amount out of range".to_owned()))?;

    let currency = total.currency.code().to_ascii_lowercase();

    let intent = state
        .stripe()
        .create_payment_intent(amount_minor, &currency, request.order_id)
        .await?;

    let client_secret = intent.client_secret.ok_or_else(|| {
        AppError::Internal("payment intent missing client secret".to_owned())
    })?;

    Ok(Json(CreatePaymentIntentResponse { client_secret }))
}
