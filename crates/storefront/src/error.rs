//! Storefront errors and their Sentry reporting.
//!
//! Every failure the storefront can surface falls into one of three kinds:
//!
//! - **Validation**: a form field rule failed. Shown inline next to the field
//!   and never written to the global store.
//! - **Request**: a backend call failed. Written to the shared error slice,
//!   shown as an error notice, and captured to Sentry.
//! - **Business**: a domain rule rejected the action (e.g. out of stock).
//!   Shown as an error notice only.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::session::CredentialError;
use crate::store::cart::CartError;
use crate::validation::ValidationErrors;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Form validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Backend API request failed.
    #[error("Request error: {0}")]
    Api(#[from] ApiError),

    /// Persisted credential could not be read or written.
    #[error("Credential error: {0}")]
    Credentials(#[from] CredentialError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Checkout step transition was refused.
    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    /// Cart operation was refused.
    #[error("{0}")]
    Cart(#[from] CartError),

    /// A domain rule rejected the action.
    #[error("{0}")]
    Business(String),
}

/// Classification used to decide where an error is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Request,
    Business,
}

impl AppError {
    /// Which of the three error kinds this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Api(_) | Self::Credentials(_) | Self::Config(_) => ErrorKind::Request,
            Self::Checkout(_) | Self::Cart(_) | Self::Business(_) => ErrorKind::Business,
        }
    }

    /// Message suitable for showing to the shopper.
    ///
    /// Backend errors prefer the server-supplied message; internal details are
    /// not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors.to_string(),
            Self::Api(err) => err
                .server_message()
                .map_or_else(|| "Something went wrong".to_string(), str::to_string),
            Self::Credentials(_) => "Could not access saved login".to_string(),
            Self::Config(_) => "Storefront is not configured".to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Business(message) => message.clone(),
        }
    }

    /// Log the error and capture request failures to Sentry.
    pub fn report(&self) {
        if self.kind() == ErrorKind::Request {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, kind = ?self.kind(), "Action rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Attach the signed-in shopper to subsequent Sentry events.
pub fn set_sentry_user(user_id: &impl ToString, username: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Detach the shopper after sign-out.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| scope.set_user(None));
}

/// Record a storefront action as a Sentry breadcrumb.
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "4")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let data = data
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| ((*key).to_string(), serde_json::Value::from(*value)))
        .collect();

    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data,
        ..Default::default()
    });
}
