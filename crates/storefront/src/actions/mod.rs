//! Async actions.
//!
//! Each action follows the same lifecycle: dispatch the pending flag, await
//! the backend, then dispatch the result (and queue a notice) or dispatch the
//! error. There are no retries; when two requests for the same slice race,
//! the one that resolves last wins.

mod auth;
mod cart;
mod checkout;
mod orders;
mod products;

pub use checkout::{PaymentConfirmation, PaymentElement};
