//! Session-stored types.
//!
//! The session carries exactly two things: who is logged in and what is in
//! the cart. Both die with the session.

use serde::{Deserialize, Serialize};

use neon_pulse_core::{Email, UserId, UserRole};

/// Session-stored identity of the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Account ID from the identity service.
    pub id: UserId,
    /// Account email.
    pub email: Email,
    /// Customer or staff.
    pub role: UserRole,
}

/// Session keys.
pub mod keys {
    /// Key for the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the session cart.
    pub const CART: &str = "cart";
}
