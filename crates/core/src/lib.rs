//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Bazaar components:
//! - `storefront` - Client-side state store, checkout flow and backend API client
//! - `cli` - Terminal driver for browsing the catalog and account data
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no timers. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and enumerations
//! - [`text`] - Display helpers for product copy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod text;
pub mod types;

pub use text::{truncate_description, truncate_text};
pub use types::*;
