//! Staff route handlers: the order board.
//!
//! Everything here requires the staff role. Who may *act* on an order is
//! narrower still: status changes are gated on holding the assignment, and
//! that gate is enforced in the backend write, not in the UI.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use neon_pulse_core::{Order, OrderId, OrderStatus};

use crate::error::Result;
use crate::middleware::RequireStaff;
use crate::services::orders::{AssignmentOutcome, OrderService};
use crate::state::AppState;

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

/// Assignment toggle response body.
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    /// What the toggle did: `claimed` or `released`.
    pub action: AssignmentOutcome,
    pub order: Order,
}

/// Every order, newest first.
#[instrument(skip(state, staff))]
pub async fn index(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<Json<Vec<Order>>> {
    let service = OrderService::new(state.supabase());
    let orders = service.list_all().await?;

    Ok(Json(orders))
}

/// Claim or release an order.
///
/// One endpoint with toggle semantics, matching the single board button:
/// unassigned claims, own assignment releases, someone else's is a 409.
#[instrument(skip(state, staff), fields(staff_id = %staff.id))]
pub async fn toggle_assignment(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<OrderId>,
) -> Result<Json<AssignmentResponse>> {
    let service = OrderService::new(state.supabase());
    let (action, order) = service.toggle_assignment(id, &staff).await?;

    tracing::info!(order_id = %order.id, ?action, "assignment toggled");

    Ok(Json(AssignmentResponse { action, order }))
}

/// Set an order's status. Assignee only.
#[instrument(skip(state, staff, request), fields(staff_id = %staff.id))]
pub async fn set_status(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<OrderId>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Order>> {
    let service = OrderService::new(state.supabase());
    let order = service.update_status(id, &staff, request.status).await?;

    tracing::info!(order_id = %order.id, status = %order.status, "status updated");

    Ok(Json(order))
}
