//! Global client-side state.
//!
//! The store is split into slices, each owning its state and a deterministic
//! reducer. Every change goes through [`Store::dispatch`]; async actions in
//! [`crate::actions`] dispatch a pending action, await the backend, then
//! dispatch the outcome.
//!
//! User-visible confirmations and failures are queued as [`Notice`]s (toasts)
//! for the presentation layer to drain.

pub mod auth;
pub mod cart;
pub mod errors;
pub mod payment;
pub mod products;

use std::collections::VecDeque;

use tracing::debug;

pub use auth::{AuthAction, AuthState};
pub use cart::{CartAction, CartError, CartLine, CartState};
pub use errors::{RequestStatus, StatusAction};
pub use payment::{PaymentAction, PaymentState};
pub use products::{ProductAction, ProductState};

/// Any action accepted by the store.
#[derive(Debug, Clone)]
pub enum Action {
    Products(ProductAction),
    Status(StatusAction),
    Cart(CartAction),
    Auth(AuthAction),
    Payment(PaymentAction),
}

impl From<ProductAction> for Action {
    fn from(action: ProductAction) -> Self {
        Self::Products(action)
    }
}

impl From<StatusAction> for Action {
    fn from(action: StatusAction) -> Self {
        Self::Status(action)
    }
}

impl From<CartAction> for Action {
    fn from(action: CartAction) -> Self {
        Self::Cart(action)
    }
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Self::Auth(action)
    }
}

impl From<PaymentAction> for Action {
    fn from(action: PaymentAction) -> Self {
        Self::Payment(action)
    }
}

impl Action {
    /// Short name for logging. Payloads may carry tokens and are not logged.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Products(ProductAction::FetchProducts { .. }) => "FETCH_PRODUCTS",
            Self::Products(ProductAction::FetchCategories { .. }) => "FETCH_CATEGORIES",
            Self::Status(StatusAction::IsFetching) => "IS_FETCHING",
            Self::Status(StatusAction::IsSuccess) => "IS_SUCCESS",
            Self::Status(StatusAction::IsError(_)) => "IS_ERROR",
            Self::Status(StatusAction::ButtonLoader) => "BUTTON_LOADER",
            Self::Status(StatusAction::CategoryLoader) => "CATEGORY_LOADER",
            Self::Status(StatusAction::CategorySuccess) => "CATEGORY_SUCCESS",
            Self::Status(StatusAction::CategoryError(_)) => "CATEGORY_ERROR",
            Self::Cart(CartAction::Add(_)) => "ADD_CART",
            Self::Cart(CartAction::Remove(_)) => "REMOVE_CART",
            Self::Cart(CartAction::Increase(_)) => "INCREASE_QUANTITY",
            Self::Cart(CartAction::Decrease(_)) => "DECREASE_QUANTITY",
            Self::Cart(CartAction::Clear) => "CLEAR_CART",
            Self::Cart(CartAction::Synced(_)) => "CART_SYNCED",
            Self::Auth(AuthAction::LoginUser { .. }) => "LOGIN_USER",
            Self::Auth(AuthAction::UserAddresses(_)) => "USER_ADDRESS",
            Self::Auth(AuthAction::UserOrders(_)) => "GET_USER_ORDERS",
            Self::Auth(AuthAction::SelectCheckoutAddress(_)) => "SELECT_CHECKOUT_ADDRESS",
            Self::Auth(AuthAction::RemoveCheckoutAddress) => "REMOVE_CHECKOUT_ADDRESS",
            Self::Auth(AuthAction::ClientSecret(_)) => "CLIENT_SECRET",
            Self::Auth(AuthAction::RemoveClientSecretAndAddress) => "REMOVE_CLIENT_SECRET_ADDRESS",
            Self::Auth(AuthAction::LogOut) => "LOG_OUT",
            Self::Payment(PaymentAction::AddPaymentMethod(_)) => "ADD_PAYMENT_METHOD",
        }
    }
}

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// The global store.
#[derive(Debug, Default)]
pub struct Store {
    products: ProductState,
    status: RequestStatus,
    cart: CartState,
    auth: AuthState,
    payment: PaymentState,
    notices: VecDeque<Notice>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose auth slice starts from a persisted token.
    #[must_use]
    pub fn with_auth(auth: AuthState) -> Self {
        Self {
            auth,
            ..Self::default()
        }
    }

    /// Route an action to its slice reducer.
    pub fn dispatch(&mut self, action: impl Into<Action>) {
        let action = action.into();
        debug!(action = action.name(), "dispatch");

        match action {
            Action::Products(action) => self.products.reduce(action),
            Action::Status(action) => self.status.reduce(action),
            Action::Cart(action) => self.cart.reduce(action),
            Action::Auth(action) => self.auth.reduce(action),
            Action::Payment(action) => self.payment.reduce(action),
        }
    }

    /// Queue a toast.
    pub fn notify(&mut self, notice: Notice) {
        debug!(kind = ?notice.kind, message = %notice.message, "notice");
        self.notices.push_back(notice);
    }

    /// Take every queued toast, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    #[must_use]
    pub const fn products(&self) -> &ProductState {
        &self.products
    }

    #[must_use]
    pub const fn status(&self) -> &RequestStatus {
        &self.status
    }

    #[must_use]
    pub const fn cart(&self) -> &CartState {
        &self.cart
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthState {
        &self.auth
    }

    #[must_use]
    pub const fn payment(&self) -> &PaymentState {
        &self.payment
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::PaymentMethod;

    use super::*;

    #[test]
    fn test_dispatch_routes_to_slices() {
        let mut store = Store::new();
        store.dispatch(StatusAction::IsFetching);
        store.dispatch(PaymentAction::AddPaymentMethod(PaymentMethod::Stripe));

        assert!(store.status().is_loading);
        assert_eq!(store.payment().payment_method, Some(PaymentMethod::Stripe));
    }

    #[test]
    fn test_notices_drain_in_order() {
        let mut store = Store::new();
        store.notify(Notice::success("Login Success"));
        store.notify(Notice::error("Out of stock"));

        let notices = store.drain_notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].kind, NoticeKind::Success);
        assert_eq!(notices[1].message, "Out of stock");
        assert!(store.drain_notices().is_empty());
    }
}
