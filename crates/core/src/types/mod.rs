//! Domain types for NeonPulse.
//!
//! Everything here is plain data plus pure functions: the web service and
//! the tests both build on these without pulling in any I/O.

mod cart;
mod customization;
mod email;
mod id;
mod money;
mod order;
mod pricing;
mod status;

pub use cart::{Cart, CartItem};
pub use customization::{Customization, SignColor, SignFont, SignText, SignTextError};
pub use email::{Email, EmailError};
pub use id::{OrderId, ProductId, UserId};
pub use money::{CurrencyCode, Money};
pub use order::{
    AssignedStaff, AssignmentDecision, AssignmentDenied, Order, ShippingDetails,
    decide_assignment,
};
pub use pricing::{LetterTier, PRICE_TIERS, price_for_letter_count};
pub use status::{OrderStatus, UserRole};
