//! Bazaar Storefront library.
//!
//! The client side of the Bazaar shop, without a rendering layer: a global
//! store with per-slice reducers, async actions that talk to the REST
//! backend, URL-driven catalog filtering and pagination, form validation,
//! and the checkout wizard.
//!
//! # Modules
//!
//! - [`store`] - State slices, reducers and the notice queue
//! - [`actions`] - Async operations on a [`Storefront`] session
//! - [`api`] - Backend HTTP client with catalog caching
//! - [`checkout`] - Checkout wizard and order summary
//! - [`filter`], [`pagination`], [`query`], [`search`] - Catalog navigation
//! - [`validation`] - Form field rules
//! - [`views`], [`routes`] - Derived page content and route guards

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod actions;
pub mod api;
pub mod checkout;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod routes;
pub mod search;
pub mod session;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod validation;
pub mod views;

pub use actions::{PaymentConfirmation, PaymentElement};
pub use api::ApiClient;
pub use config::StorefrontConfig;
pub use error::{AppError, ErrorKind};
pub use query::{Location, QueryParams};
pub use routes::Route;
pub use state::{SessionSettings, Storefront};
pub use store::{Notice, NoticeKind, Store};
