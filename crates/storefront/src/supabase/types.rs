//! Wire types for the hosted backend's REST API.
//!
//! Row types mirror the `users` and `orders` tables (snake_case columns);
//! conversion into domain types happens at this boundary so the rest of the
//! service only sees `neon_pulse_core` types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use neon_pulse_core::{
    AssignedStaff, CartItem, CurrencyCode, Customization, Email, Money, Order, OrderId,
    OrderStatus, ShippingDetails, UserId, UserRole,
};

use super::SupabaseError;

// =============================================================================
// Auth (GoTrue)
// =============================================================================

/// An authenticated identity as returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
}

/// A password-grant session.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

/// Signup responses vary with email-confirmation settings: the user object
/// arrives either bare or wrapped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Wrapped { user: AuthUser },
    Bare(AuthUser),
}

impl SignUpResponse {
    /// The created identity, whichever shape it arrived in.
    #[must_use]
    pub fn into_user(self) -> AuthUser {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}

// =============================================================================
// users table
// =============================================================================

/// A row in the `users` profile table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Insert payload for the `users` profile table.
#[derive(Debug, Clone, Serialize)]
pub struct NewUserProfile {
    pub id: UserId,
    pub email: String,
    pub phone_number: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

// =============================================================================
// orders table
// =============================================================================

/// A row in the `orders` table.
///
/// Assignment is three nullable columns rather than a nested object so the
/// claim/release writes can filter on `assigned_to_id` directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub shipping_details: ShippingDetails,
    pub customization: Option<Customization>,
    pub assigned_to_id: Option<UserId>,
    pub assigned_to_email: Option<String>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Convert the row into a domain [`Order`].
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Data`] if the assignment columns are
    /// inconsistent (an assignee id without email/timestamp) or the stored
    /// email does not parse.
    pub fn into_order(self) -> Result<Order, SupabaseError> {
        let assigned_to = match (self.assigned_to_id, self.assigned_to_email, self.assigned_at)
        {
            (None, _, _) => None,
            (Some(staff_id), Some(email), Some(assigned_at)) => {
                let staff_email = Email::parse(&email).map_err(|e| {
                    SupabaseError::Data(format!("invalid assignee email in order row: {e}"))
                })?;
                Some(AssignedStaff {
                    staff_id,
                    staff_email,
                    assigned_at,
                })
            }
            (Some(_), _, _) => {
                return Err(SupabaseError::Data(
                    "order row has assignee id without email or timestamp".to_owned(),
                ));
            }
        };

        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            status: self.status,
            items: self.items,
            total: Money::new(self.total, CurrencyCode::Eur),
            shipping_details: self.shipping_details,
            customization: self.customization,
            assigned_to,
            created_at: self.created_at,
        })
    }
}

/// Insert payload for the `orders` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderRecord {
    pub user_id: UserId,
    pub status: OrderStatus,
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub shipping_details: ShippingDetails,
    pub customization: Option<Customization>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(assigned: bool) -> OrderRecord {
        OrderRecord {
            id: OrderId::new(Uuid::new_v4()),
            user_id: UserId::new(Uuid::new_v4()),
            status: OrderStatus::Pending,
            items: Vec::new(),
            total: Decimal::from(63),
            shipping_details: ShippingDetails {
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                email: "ada@example.com".to_owned(),
                phone: "+33600000000".to_owned(),
                address: "1 rue de la Paix".to_owned(),
                address_complement: "Apt 2".to_owned(),
                city: "Paris".to_owned(),
                postal_code: "75002".to_owned(),
                country: "FR".to_owned(),
            },
            customization: None,
            assigned_to_id: assigned.then(|| UserId::new(Uuid::new_v4())),
            assigned_to_email: assigned.then(|| "staff@neonpulse.shop".to_owned()),
            assigned_at: assigned.then(Utc::now),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_into_order_unassigned() {
        let order = record(false).into_order().unwrap();
        assert!(order.assigned_to.is_none());
        assert_eq!(order.total.amount, Decimal::from(63));
    }

    #[test]
    fn test_into_order_assigned() {
        let order = record(true).into_order().unwrap();
        let assigned = order.assigned_to.unwrap();
        assert_eq!(assigned.staff_email.as_str(), "staff@neonpulse.shop");
    }

    #[test]
    fn test_into_order_rejects_partial_assignment() {
        let mut row = record(true);
        row.assigned_to_email = None;
        assert!(matches!(
            row.into_order(),
            Err(SupabaseError::Data(_))
        ));
    }

    #[test]
    fn test_signup_response_shapes() {
        let bare: SignUpResponse = serde_json::from_str(
            r#"{"id":"00000000-0000-0000-0000-000000000001","email":"a@b.c"}"#,
        )
        .unwrap();
        let wrapped: SignUpResponse = serde_json::from_str(
            r#"{"user":{"id":"00000000-0000-0000-0000-000000000001","email":"a@b.c"}}"#,
        )
        .unwrap();

        assert_eq!(bare.into_user().email, "a@b.c");
        assert_eq!(wrapped.into_user().email, "a@b.c");
    }
}
