//! Orders and staff assignment.
//!
//! An order is created at checkout and never deleted; staff work it through
//! the status enum. Assignment is exclusive: at most one staff member holds
//! an order at a time, and only the holder may release it or act on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::CartItem;
use super::customization::Customization;
use super::email::Email;
use super::id::{OrderId, UserId};
use super::money::Money;
use super::status::OrderStatus;

/// Shipping details captured at checkout. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub address_complement: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingDetails {
    /// Names of fields that are empty or whitespace-only.
    ///
    /// The checkout form requires every field; an empty list means the
    /// details are complete.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields: [(&'static str, &str); 9] = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("addressComplement", &self.address_complement),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
        ];

        fields
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

/// The staff member currently holding an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssignedStaff {
    /// Staff account ID.
    pub staff_id: UserId,
    /// Staff email, shown on the board and in denial messages.
    pub staff_email: Email,
    /// When the order was claimed.
    pub assigned_at: DateTime<Utc>,
}

/// A customer order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub items: Vec<CartItem>,
    pub total: Money,
    pub shipping_details: ShippingDetails,
    /// Configuration of the first sign, mirrored at the top level for the
    /// workshop view.
    pub customization: Option<Customization>,
    pub assigned_to: Option<AssignedStaff>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Whether `staff_id` currently holds this order.
    #[must_use]
    pub fn is_assigned_to(&self, staff_id: UserId) -> bool {
        self.assigned_to
            .as_ref()
            .is_some_and(|a| a.staff_id == staff_id)
    }
}

/// What an assignment request by a staff member should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentDecision {
    /// The order is unassigned: the requester claims it.
    Claim,
    /// The requester already holds the order: the request releases it.
    Release,
}

/// An assignment request denied because another staff member holds the order.
#[derive(thiserror::Error, Debug, Clone)]
#[error("order is already assigned to {assignee_email}")]
pub struct AssignmentDenied {
    /// Email of the staff member who holds the order.
    pub assignee_email: Email,
}

/// Decide what an assignment request does.
///
/// The same button claims and releases: claiming an unassigned order takes
/// it, a second request by the holder gives it back, and a request against
/// someone else's order is denied without mutating anything.
///
/// # Errors
///
/// Returns [`AssignmentDenied`] naming the current holder when the order is
/// assigned to a different staff member.
pub fn decide_assignment(
    current: Option<&AssignedStaff>,
    staff_id: UserId,
) -> Result<AssignmentDecision, AssignmentDenied> {
    match current {
        None => Ok(AssignmentDecision::Claim),
        Some(assigned) if assigned.staff_id == staff_id => Ok(AssignmentDecision::Release),
        Some(assigned) => Err(AssignmentDenied {
            assignee_email: assigned.staff_email.clone(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn staff(email: &str) -> (UserId, AssignedStaff) {
        let id = UserId::new(Uuid::new_v4());
        let assigned = AssignedStaff {
            staff_id: id,
            staff_email: Email::parse(email).unwrap(),
            assigned_at: Utc::now(),
        };
        (id, assigned)
    }

    #[test]
    fn test_unassigned_order_is_claimed() {
        let (id, _) = staff("a@neonpulse.shop");
        assert_eq!(
            decide_assignment(None, id).unwrap(),
            AssignmentDecision::Claim
        );
    }

    #[test]
    fn test_other_staff_is_denied_without_mutation() {
        let (_, held_by_a) = staff("a@neonpulse.shop");
        let (b, _) = staff("b@neonpulse.shop");

        let denied = decide_assignment(Some(&held_by_a), b).unwrap_err();
        assert_eq!(denied.assignee_email.as_str(), "a@neonpulse.shop");
    }

    #[test]
    fn test_holder_request_releases() {
        let (a, held_by_a) = staff("a@neonpulse.shop");
        assert_eq!(
            decide_assignment(Some(&held_by_a), a).unwrap(),
            AssignmentDecision::Release
        );
    }

    #[test]
    fn test_claim_deny_release_sequence() {
        // The board's three-step sequence: A claims, B bounces, A releases.
        let (a, held_by_a) = staff("a@neonpulse.shop");
        let (b, _) = staff("b@neonpulse.shop");

        assert_eq!(
            decide_assignment(None, a).unwrap(),
            AssignmentDecision::Claim
        );
        assert!(decide_assignment(Some(&held_by_a), b).is_err());
        assert_eq!(
            decide_assignment(Some(&held_by_a), a).unwrap(),
            AssignmentDecision::Release
        );
    }

    #[test]
    fn test_missing_fields_lists_empty_ones() {
        let details = ShippingDetails {
            first_name: "Ada".to_owned(),
            last_name: String::new(),
            email: "ada@example.com".to_owned(),
            phone: "  ".to_owned(),
            address: "1 rue de la Paix".to_owned(),
            address_complement: "Apt 2".to_owned(),
            city: "Paris".to_owned(),
            postal_code: "75002".to_owned(),
            country: "FR".to_owned(),
        };

        assert_eq!(details.missing_fields(), vec!["lastName", "phone"]);
    }

    #[test]
    fn test_is_assigned_to() {
        let (a, held_by_a) = staff("a@neonpulse.shop");
        let (b, _) = staff("b@neonpulse.shop");

        let order = Order {
            id: OrderId::new(Uuid::new_v4()),
            user_id: UserId::new(Uuid::new_v4()),
            status: OrderStatus::Pending,
            items: Vec::new(),
            total: Money::zero(),
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
            assigned_to: Some(held_by_a),
            created_at: Utc::now(),
        };

        assert!(order.is_assigned_to(a));
        assert!(!order.is_assigned_to(b));
    }
}
