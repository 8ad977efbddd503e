//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Account registration and login, fronting the hosted identity
//!   service
//! - `orders` - Order creation from the session cart, customer history, and
//!   the staff assignment/status rules

pub mod auth;
pub mod orders;
