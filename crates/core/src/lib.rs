//! NeonPulse Core - Shared domain types.
//!
//! This crate provides the domain model shared across NeonPulse components:
//! - `storefront` - Public configurator, cart, checkout, and staff order board
//! - `integration-tests` - End-to-end tests against a spawned storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain logic - no I/O, no
//! HTTP clients, no async. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - IDs, money, pricing tiers, sign customization, the session
//!   cart, and order/assignment rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
