//! Checkout step wizard.
//!
//! Four steps in a fixed order: address, payment method, order summary,
//! payment. Moving forward is gated on the selections the current step is
//! responsible for; moving back is always allowed except from the first step.

mod summary;

use bazaar_core::{AddressId, PaymentMethod};
use thiserror::Error;

use crate::store::{CartState, RequestStatus, Store};

pub use summary::{OrderSummary, SummaryLine, TAX_LABEL, pay_button_label};

/// Refused step transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Please select checkout address before proceeding.")]
    AddressRequired,
    #[error("Please select payment method before proceeding.")]
    PaymentMethodRequired,
}

/// A step of the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum CheckoutStep {
    #[default]
    Address,
    PaymentMethod,
    OrderSummary,
    Payment,
}

impl CheckoutStep {
    pub const ALL: [Self; 4] = [
        Self::Address,
        Self::PaymentMethod,
        Self::OrderSummary,
        Self::Payment,
    ];

    /// Zero-based position in the flow.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Address => 0,
            Self::PaymentMethod => 1,
            Self::OrderSummary => 2,
            Self::Payment => 3,
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Address),
            1 => Some(Self::PaymentMethod),
            2 => Some(Self::OrderSummary),
            3 => Some(Self::Payment),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Address => "Address",
            Self::PaymentMethod => "Payment Method",
            Self::OrderSummary => "Order Summary",
            Self::Payment => "Payment",
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::Address => Self::PaymentMethod,
            Self::PaymentMethod => Self::OrderSummary,
            Self::OrderSummary | Self::Payment => Self::Payment,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Address | Self::PaymentMethod => Self::Address,
            Self::OrderSummary => Self::PaymentMethod,
            Self::Payment => Self::OrderSummary,
        }
    }
}

/// What the shopper has chosen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutSelection {
    pub address: Option<AddressId>,
    pub payment_method: Option<PaymentMethod>,
}

impl CheckoutSelection {
    #[must_use]
    pub fn from_store(store: &Store) -> Self {
        Self {
            address: store.auth().selected_address_id(),
            payment_method: store.payment().payment_method,
        }
    }
}

/// Wizard state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutWizard {
    active: CheckoutStep,
    addresses_requested: bool,
}

impl CheckoutWizard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time only; the caller then loads the saved
    /// addresses.
    pub fn on_mount(&mut self) -> bool {
        !std::mem::replace(&mut self.addresses_requested, true)
    }

    #[must_use]
    pub const fn active_step(&self) -> CheckoutStep {
        self.active
    }

    /// Advance one step, clamped at the last.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` and stays put when the current step's
    /// selection is missing.
    pub fn next(&mut self, selection: CheckoutSelection) -> Result<CheckoutStep, CheckoutError> {
        match self.active {
            CheckoutStep::Address if selection.address.is_none() => {
                return Err(CheckoutError::AddressRequired);
            }
            CheckoutStep::PaymentMethod if selection.payment_method.is_none() => {
                return Err(CheckoutError::PaymentMethodRequired);
            }
            _ => {}
        }
        self.active = self.active.next();
        Ok(self.active)
    }

    /// Go back one step, clamped at the first.
    pub fn back(&mut self) -> CheckoutStep {
        self.active = self.active.previous();
        self.active
    }

    #[must_use]
    pub fn back_disabled(&self) -> bool {
        self.active == CheckoutStep::Address
    }

    #[must_use]
    pub fn next_visible(&self) -> bool {
        self.active != CheckoutStep::Payment
    }

    /// Next is shown dimmed on the address step until an address is chosen.
    #[must_use]
    pub fn next_dimmed(&self, selection: CheckoutSelection) -> bool {
        self.active == CheckoutStep::Address && selection.address.is_none()
    }

    /// Payment widget to render: only on the payment step, and only for the
    /// selected method.
    #[must_use]
    pub fn payment_widget(&self, selection: CheckoutSelection) -> Option<PaymentMethod> {
        (self.active == CheckoutStep::Payment)
            .then_some(selection.payment_method)
            .flatten()
    }

    /// What the checkout page shows. Errors win over loading, loading over
    /// the step content, whatever the active step.
    #[must_use]
    pub fn view<'a>(&self, status: &'a RequestStatus) -> CheckoutView<'a> {
        if let Some(message) = status.error_message.as_deref() {
            CheckoutView::Error(message)
        } else if status.is_loading {
            CheckoutView::Loading
        } else {
            CheckoutView::Step(self.active)
        }
    }
}

/// Content of the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutView<'a> {
    Error(&'a str),
    Loading,
    Step(CheckoutStep),
}

/// Whether entering the payment-method step must create the server cart.
#[must_use]
pub fn needs_cart_sync(cart: &CartState) -> bool {
    !cart.is_empty() && cart.cart_id().is_none()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::CartId;
    use rust_decimal::Decimal;

    use super::*;
    use crate::store::{CartAction, CartLine};

    const WITH_ADDRESS: CheckoutSelection = CheckoutSelection {
        address: Some(AddressId::new(1)),
        payment_method: None,
    };

    const COMPLETE: CheckoutSelection = CheckoutSelection {
        address: Some(AddressId::new(1)),
        payment_method: Some(PaymentMethod::Stripe),
    };

    #[test]
    fn test_labels() {
        let labels: Vec<&str> = CheckoutStep::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec!["Address", "Payment Method", "Order Summary", "Payment"]
        );
        assert_eq!(CheckoutStep::from_index(2), Some(CheckoutStep::OrderSummary));
        assert_eq!(CheckoutStep::from_index(4), None);
    }

    #[test]
    fn test_initial_state() {
        let wizard = CheckoutWizard::new();
        assert_eq!(wizard.active_step(), CheckoutStep::Address);
        assert!(wizard.back_disabled());
        assert!(wizard.next_visible());
        assert!(wizard.next_dimmed(CheckoutSelection::default()));
        assert!(!wizard.next_dimmed(WITH_ADDRESS));
    }

    #[test]
    fn test_next_requires_address() {
        let mut wizard = CheckoutWizard::new();
        let err = wizard.next(CheckoutSelection::default()).unwrap_err();
        assert_eq!(err, CheckoutError::AddressRequired);
        assert_eq!(wizard.active_step(), CheckoutStep::Address);

        assert_eq!(wizard.next(WITH_ADDRESS).unwrap(), CheckoutStep::PaymentMethod);
    }

    #[test]
    fn test_next_requires_payment_method() {
        let mut wizard = CheckoutWizard::new();
        wizard.next(WITH_ADDRESS).unwrap();

        let err = wizard.next(WITH_ADDRESS).unwrap_err();
        assert_eq!(err, CheckoutError::PaymentMethodRequired);
        assert_eq!(
            err.to_string(),
            "Please select payment method before proceeding."
        );

        assert_eq!(wizard.next(COMPLETE).unwrap(), CheckoutStep::OrderSummary);
    }

    #[test]
    fn test_walk_to_payment_and_clamp() {
        let mut wizard = CheckoutWizard::new();
        for _ in 0..3 {
            wizard.next(COMPLETE).unwrap();
        }
        assert_eq!(wizard.active_step(), CheckoutStep::Payment);
        assert!(!wizard.next_visible());

        assert_eq!(wizard.next(COMPLETE).unwrap(), CheckoutStep::Payment);
    }

    #[test]
    fn test_back_clamps_at_first() {
        let mut wizard = CheckoutWizard::new();
        wizard.next(COMPLETE).unwrap();
        assert!(!wizard.back_disabled());

        assert_eq!(wizard.back(), CheckoutStep::Address);
        assert_eq!(wizard.back(), CheckoutStep::Address);
        assert!(wizard.back_disabled());
    }

    #[test]
    fn test_payment_widget_matches_selection() {
        let mut wizard = CheckoutWizard::new();
        assert_eq!(wizard.payment_widget(COMPLETE), None);

        for _ in 0..3 {
            wizard.next(COMPLETE).unwrap();
        }
        assert_eq!(wizard.payment_widget(COMPLETE), Some(PaymentMethod::Stripe));

        let paypal = CheckoutSelection {
            payment_method: Some(PaymentMethod::Paypal),
            ..COMPLETE
        };
        assert_eq!(wizard.payment_widget(paypal), Some(PaymentMethod::Paypal));

        let none = CheckoutSelection {
            payment_method: None,
            ..COMPLETE
        };
        assert_eq!(wizard.payment_widget(none), None);
    }

    #[test]
    fn test_on_mount_requests_addresses_once() {
        let mut wizard = CheckoutWizard::new();
        assert!(wizard.on_mount());
        assert!(!wizard.on_mount());
        assert!(!wizard.on_mount());
    }

    #[test]
    fn test_view_precedence() {
        let mut wizard = CheckoutWizard::new();
        wizard.next(COMPLETE).unwrap();

        let mut status = RequestStatus {
            is_loading: true,
            error_message: Some("Failed to fetch addresses".to_string()),
            ..RequestStatus::default()
        };
        assert_eq!(
            wizard.view(&status),
            CheckoutView::Error("Failed to fetch addresses")
        );

        status.error_message = None;
        assert_eq!(wizard.view(&status), CheckoutView::Loading);

        status.is_loading = false;
        assert_eq!(
            wizard.view(&status),
            CheckoutView::Step(CheckoutStep::PaymentMethod)
        );
    }

    #[test]
    fn test_needs_cart_sync() {
        let mut cart = CartState::new();
        assert!(!needs_cart_sync(&cart));

        cart.add_item(CartLine {
            product_id: bazaar_core::ProductId::new(1),
            product_name: "Mouse".to_string(),
            image: String::new(),
            description: String::new(),
            price: Decimal::from(25),
            special_price: None,
            quantity: 1,
            available: 3,
        });
        assert!(needs_cart_sync(&cart));

        cart.reduce(CartAction::Synced(CartId::new(9)));
        assert!(!needs_cart_sync(&cart));
    }
}
