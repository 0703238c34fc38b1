//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::{PriceError, format_price, format_price_calculation, parse_amount, round_to_cents};
pub use status::*;
