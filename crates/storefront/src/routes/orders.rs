//! Order route handlers (customer side).
//!
//! Checkout order of operations, mirrored by the SPA:
//! 1. `POST /api/orders` turns the session cart into a pending order
//! 2. `POST /api/create-payment-intent` funds it (see `checkout`)
//! 3. The SPA confirms the payment with the provider and clears the cart

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use neon_pulse_core::{Order, OrderId, ShippingDetails};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::orders::OrderService;
use crate::state::AppState;

use super::cart::load_cart;

/// Create an order from the session cart.
///
/// The body is the shipping form; the items and the total come from the
/// session cart, never from the client. An empty cart is rejected here,
/// before anything reaches the payment relay.
#[instrument(skip(state, session, user, shipping_details))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Json(shipping_details): Json<ShippingDetails>,
) -> Result<Response> {
    let cart = load_cart(&session).await?;

    let service = OrderService::new(state.supabase());
    let order = service
        .create_from_cart(&user, &cart, shipping_details)
        .await?;

    tracing::info!(order_id = %order.id, total = %order.total, "order created");

    Ok((StatusCode::CREATED, Json(order)).into_response())
}

/// Own order history, newest first.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let service = OrderService::new(state.supabase());
    let orders = service.list_for_user(user.id).await?;

    Ok(Json(orders))
}

/// One of the caller's orders.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let service = OrderService::new(state.supabase());
    let order = service.get_for_user(&user, id).await?;

    Ok(Json(order))
}
