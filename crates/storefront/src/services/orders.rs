//! Order service: checkout, history, and the staff workflow.
//!
//! Assignment rules live in `neon_pulse_core::decide_assignment`; this
//! service applies the decision against the backend with conditional writes
//! so "check who holds it" and "write" cannot race apart.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use neon_pulse_core::{
    AssignedStaff, AssignmentDecision, Cart, Order, OrderId, OrderStatus, ShippingDetails,
    UserId, decide_assignment,
};

use crate::models::session::CurrentUser;
use crate::supabase::types::NewOrderRecord;
use crate::supabase::{SupabaseClient, SupabaseError};

/// Order workflow errors.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No such order (or not visible to the caller).
    #[error("order not found")]
    NotFound,

    /// The cart has nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// Required shipping fields are missing.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Another staff member holds the order.
    #[error("order is already assigned to {assignee}")]
    AlreadyAssigned {
        /// Email of the current holder.
        assignee: String,
    },

    /// The caller is not the order's assignee.
    #[error("order is not assigned to you")]
    NotAssignee,

    /// The hosted backend failed.
    #[error("backend error: {0}")]
    Backend(#[from] SupabaseError),
}

/// What an assignment toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentOutcome {
    /// The caller now holds the order.
    Claimed,
    /// The caller gave the order back.
    Released,
}

/// Order service.
pub struct OrderService<'a> {
    supabase: &'a SupabaseClient,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(supabase: &'a SupabaseClient) -> Self {
        Self { supabase }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Create an order from the session cart.
    ///
    /// Validates the shipping details and refuses an empty cart - a zero
    /// total must never reach the payment relay. The total is computed
    /// server-side from the cart; the first line's customization is
    /// mirrored at the top level for the workshop view.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::MissingFields`] or [`OrderError::EmptyCart`]
    /// for bad input, [`OrderError::Backend`] when the insert fails.
    pub async fn create_from_cart(
        &self,
        user: &CurrentUser,
        cart: &Cart,
        shipping_details: ShippingDetails,
    ) -> Result<Order, OrderError> {
        let missing = shipping_details.missing_fields();
        if !missing.is_empty() {
            return Err(OrderError::MissingFields(missing));
        }

        let total = cart.total();
        if cart.is_empty() || !total.is_positive() {
            return Err(OrderError::EmptyCart);
        }

        let record = self
            .supabase
            .insert_order(&NewOrderRecord {
                user_id: user.id,
                status: OrderStatus::Pending,
                items: cart.items().to_vec(),
                total: total.amount,
                shipping_details,
                customization: cart
                    .items()
                    .first()
                    .and_then(|item| item.customization.clone()),
                created_at: Utc::now(),
            })
            .await?;

        Ok(record.into_order()?)
    }

    // =========================================================================
    // Customer views
    // =========================================================================

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Backend`] when the backend fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        let records = self.supabase.orders_for_user(user_id).await?;
        records
            .into_iter()
            .map(|r| r.into_order().map_err(OrderError::from))
            .collect()
    }

    /// One order, visible only to its owner (or staff).
    ///
    /// Someone else's order reads as not-found rather than forbidden, so
    /// order IDs can't be probed.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] if the order doesn't exist or
    /// belongs to someone else.
    pub async fn get_for_user(
        &self,
        user: &CurrentUser,
        order_id: OrderId,
    ) -> Result<Order, OrderError> {
        let record = self
            .supabase
            .order_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        let order = record.into_order()?;

        if order.user_id != user.id && !user.role.is_staff() {
            return Err(OrderError::NotFound);
        }

        Ok(order)
    }

    // =========================================================================
    // Staff workflow
    // =========================================================================

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Backend`] when the backend fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        let records = self.supabase.all_orders().await?;
        records
            .into_iter()
            .map(|r| r.into_order().map_err(OrderError::from))
            .collect()
    }

    /// Claim or release an order for a staff member.
    ///
    /// One endpoint, toggle semantics: an unassigned order is claimed, an
    /// order the caller holds is released, and an order somebody else holds
    /// is denied without mutation. The backend write re-checks the holder
    /// via its row filter, so a stale read cannot steal an order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for an unknown order and
    /// [`OrderError::AlreadyAssigned`] when another staff member holds it.
    pub async fn toggle_assignment(
        &self,
        order_id: OrderId,
        staff: &CurrentUser,
    ) -> Result<(AssignmentOutcome, Order), OrderError> {
        let record = self
            .supabase
            .order_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;
        let order = record.into_order()?;

        let decision = decide_assignment(order.assigned_to.as_ref(), staff.id).map_err(
            |denied| OrderError::AlreadyAssigned {
                assignee: denied.assignee_email.into_inner(),
            },
        )?;

        match decision {
            AssignmentDecision::Claim => {
                let assignment = AssignedStaff {
                    staff_id: staff.id,
                    staff_email: staff.email.clone(),
                    assigned_at: Utc::now(),
                };

                let updated = self
                    .supabase
                    .claim_order(order_id, &assignment)
                    .await?
                    // The conditional write found the order taken after all
                    .ok_or_else(|| OrderError::AlreadyAssigned {
                        assignee: "another staff member".to_owned(),
                    })?;

                Ok((AssignmentOutcome::Claimed, updated.into_order()?))
            }
            AssignmentDecision::Release => {
                let updated = self
                    .supabase
                    .release_order(order_id, staff.id)
                    .await?
                    .ok_or(OrderError::NotAssignee)?;

                Ok((AssignmentOutcome::Released, updated.into_order()?))
            }
        }
    }

    /// Set an order's status. Assignee only.
    ///
    /// The status enum is closed but transitions are free: staff may move
    /// an order between any two statuses. What is enforced is *who* - the
    /// write filters on the caller being the assignee.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotAssignee`] when the caller doesn't hold the
    /// order, [`OrderError::NotFound`] for an unknown order.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        staff: &CurrentUser,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        match self.supabase.set_status(order_id, staff.id, status).await? {
            Some(updated) => Ok(updated.into_order()?),
            None => {
                // Distinguish "not yours" from "doesn't exist" for the error
                match self.supabase.order_by_id(order_id).await? {
                    Some(_) => Err(OrderError::NotAssignee),
                    None => Err(OrderError::NotFound),
                }
            }
        }
    }
}
