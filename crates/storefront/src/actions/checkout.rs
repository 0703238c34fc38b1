//! Addresses, payment method, server cart and payment confirmation.

use bazaar_core::{AddressId, PaymentMethod, round_to_cents};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::SecretString;
use tracing::instrument;
use url::Url;

use crate::api::{AddressInput, ClientSecretRequest, Order, PlaceOrderRequest};
use crate::checkout::{
    CheckoutError, CheckoutSelection, CheckoutStep, CheckoutWizard, needs_cart_sync,
};
use crate::error::{AppError, add_breadcrumb};
use crate::state::Storefront;
use crate::store::{AuthAction, CartAction, Notice, PaymentAction, StatusAction};
use crate::validation::{ADDRESS_FORM, FormData};

const CURRENCY: &str = "usd";

/// Outcome reported by the card provider after the shopper confirms payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub payment_id: String,
    pub status: String,
    pub message: String,
}

/// Everything the card widget is mounted with on the payment step.
#[derive(Debug, Clone)]
pub struct PaymentElement {
    pub publishable_key: SecretString,
    pub client_secret: SecretString,
    pub return_url: Url,
}

impl Storefront {
    /// Load the signed-in user's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` when not signed in or if the request fails.
    #[instrument(skip(self))]
    pub async fn get_user_addresses(&mut self) -> Result<(), AppError> {
        let token = self.require_token()?;
        self.store_mut().dispatch(StatusAction::IsFetching);

        match self.api().get_user_addresses(&token).await {
            Ok(addresses) => {
                let store = self.store_mut();
                store.dispatch(AuthAction::UserAddresses(addresses));
                store.dispatch(StatusAction::IsSuccess);
                Ok(())
            }
            Err(e) => Err(self.request_failed(e, "Failed to fetch user's addresses")),
        }
    }

    /// Create (`address_id` is `None`) or update an address, then reload the
    /// saved addresses.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` (no request sent) for an incomplete
    /// form, or `AppError::Api` if saving fails.
    #[instrument(skip(self, form))]
    pub async fn add_update_user_address(
        &mut self,
        form: &FormData,
        address_id: Option<AddressId>,
    ) -> Result<(), AppError> {
        ADDRESS_FORM.validate(form)?;
        let token = self.require_token()?;

        let input = AddressInput {
            city: form.get("city").trim().to_string(),
            street: form.get("street").trim().to_string(),
            postcode: form.get("postcode").trim().to_string(),
            country: form.get("country").trim().to_string(),
        };

        self.store_mut().dispatch(StatusAction::ButtonLoader);

        let saved = match address_id {
            Some(id) => self.api().update_address(&token, id, &input).await,
            None => self.api().create_address(&token, &input).await,
        };

        match saved {
            Ok(address) => {
                tracing::info!(address_id = %address.address_id, "Address saved");
                self.store_mut()
                    .notify(Notice::success("Address saved successfully"));
                self.get_user_addresses().await
            }
            Err(e) => {
                let err = self.notify_failure(e, "Internal Server Error");
                // Clears the button loader without touching the error slice
                self.store_mut().dispatch(StatusAction::IsSuccess);
                Err(err)
            }
        }
    }

    /// Delete a saved address, dropping it from the checkout selection.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` when not signed in or if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_user_address(&mut self, address_id: AddressId) -> Result<(), AppError> {
        let token = self.require_token()?;
        self.store_mut().dispatch(StatusAction::ButtonLoader);

        match self.api().delete_address(&token, address_id).await {
            Ok(()) => {
                let store = self.store_mut();
                if store.auth().selected_address_id() == Some(address_id) {
                    store.dispatch(AuthAction::RemoveCheckoutAddress);
                }
                store.dispatch(StatusAction::IsSuccess);
                store.notify(Notice::success("Address deleted successfully"));
                self.get_user_addresses().await
            }
            Err(e) => {
                let err = self.notify_failure(e, "Internal Server Error");
                self.store_mut().dispatch(StatusAction::IsSuccess);
                Err(err)
            }
        }
    }

    /// Choose one of the saved addresses for checkout.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Business` if the address is not one of the user's.
    pub fn select_user_checkout_address(&mut self, address_id: AddressId) -> Result<(), AppError> {
        let Some(address) = self.store().auth().address(address_id).cloned() else {
            return Err(self.notify_failure(
                AppError::Business(format!("Unknown address {address_id}")),
                "",
            ));
        };

        self.store_mut()
            .dispatch(AuthAction::SelectCheckoutAddress(address));
        Ok(())
    }

    /// Choose how to pay.
    pub fn add_payment_method(&mut self, method: PaymentMethod) {
        self.store_mut()
            .dispatch(PaymentAction::AddPaymentMethod(method));
    }

    /// Create the server cart from the local lines.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` when not signed in or if the request fails.
    #[instrument(skip(self))]
    pub async fn create_user_cart(&mut self) -> Result<(), AppError> {
        let token = self.require_token()?;
        let items = self.store().cart().to_request();
        self.store_mut().dispatch(StatusAction::IsFetching);

        match self.api().create_cart(&token, &items).await {
            Ok(cart) => {
                tracing::info!(cart_id = %cart.cart_id, lines = items.len(), "Server cart created");
                let store = self.store_mut();
                store.dispatch(CartAction::Synced(cart.cart_id));
                store.dispatch(StatusAction::IsSuccess);
                Ok(())
            }
            Err(e) => Err(self.request_failed(e, "Failed to create cart")),
        }
    }

    /// Sync the server cart if the local cart changed since the last sync.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the cart cannot be created.
    pub async fn enter_payment_method_step(&mut self) -> Result<(), AppError> {
        if needs_cart_sync(self.store().cart()) {
            self.create_user_cart().await?;
        }
        Ok(())
    }

    /// Mount the checkout page: the first mount loads the saved addresses.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the addresses cannot be loaded.
    pub async fn checkout_mount(&mut self, wizard: &mut CheckoutWizard) -> Result<(), AppError> {
        if wizard.on_mount() {
            self.get_user_addresses().await?;
        }
        Ok(())
    }

    /// Advance the wizard.
    ///
    /// Refusals queue an error notice and leave the step unchanged. Entering
    /// the payment-method step syncs the server cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Checkout` when the step's selection is missing or
    /// `AppError::Api` if the cart sync fails.
    #[instrument(skip_all, fields(from = ?wizard.active_step()))]
    pub async fn checkout_next(
        &mut self,
        wizard: &mut CheckoutWizard,
    ) -> Result<CheckoutStep, AppError> {
        let selection = CheckoutSelection::from_store(self.store());
        let step = match wizard.next(selection) {
            Ok(step) => step,
            Err(e) => return Err(self.notify_failure(e, "")),
        };

        if step == CheckoutStep::PaymentMethod {
            self.enter_payment_method_step().await?;
        }
        Ok(step)
    }

    /// Create a card payment intent for `total` dollars and store its secret.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` when not signed in or if the request fails.
    #[instrument(skip(self), fields(total = %total))]
    pub async fn create_stripe_payment_secret(&mut self, total: Decimal) -> Result<(), AppError> {
        let token = self.require_token()?;
        let amount = (round_to_cents(total) * Decimal::ONE_HUNDRED)
            .to_i64()
            .ok_or_else(|| AppError::Business(format!("Amount out of range: {total}")))?;

        let request = ClientSecretRequest {
            amount,
            currency: CURRENCY.to_string(),
        };

        self.store_mut().dispatch(StatusAction::IsFetching);

        match self.api().create_stripe_client_secret(&token, &request).await {
            Ok(secret) => {
                let store = self.store_mut();
                store.dispatch(AuthAction::ClientSecret(secret));
                store.dispatch(StatusAction::IsSuccess);
                Ok(())
            }
            Err(e) => {
                let err = self.request_failed(e, "Failed to create client secret");
                self.store_mut()
                    .notify(Notice::error(err.user_message()));
                Err(err)
            }
        }
    }

    /// The card widget for the payment step.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Business` when no publishable key is configured or
    /// no client secret has been created yet.
    pub fn stripe_payment_element(&self) -> Result<PaymentElement, AppError> {
        let settings = self.settings();
        let publishable_key = settings
            .stripe_publishable_key
            .clone()
            .ok_or_else(|| AppError::Business("Stripe is not configured".to_string()))?;
        let client_secret = self
            .store()
            .auth()
            .client_secret
            .clone()
            .ok_or_else(|| AppError::Business("Payment is not ready yet".to_string()))?;

        Ok(PaymentElement {
            publishable_key,
            client_secret,
            return_url: settings.payment_return_url.clone(),
        })
    }

    /// Place the order for a confirmed card payment.
    ///
    /// On success the cart, client secret and checkout address are cleared.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Checkout` without a selected address, or
    /// `AppError::Api` if the order cannot be placed.
    #[instrument(skip(self, confirmation), fields(status = %confirmation.status))]
    pub async fn stripe_payment_confirmation(
        &mut self,
        confirmation: PaymentConfirmation,
    ) -> Result<Order, AppError> {
        let token = self.require_token()?;
        let Some(address_id) = self.store().auth().selected_address_id() else {
            return Err(self.notify_failure(CheckoutError::AddressRequired, ""));
        };

        let request = PlaceOrderRequest {
            address_id,
            pg_name: PaymentMethod::Stripe.as_str().to_string(),
            pg_payment_id: confirmation.payment_id,
            pg_status: confirmation.status,
            pg_response_message: confirmation.message,
        };

        self.store_mut().dispatch(StatusAction::IsFetching);

        match self
            .api()
            .place_order(&token, PaymentMethod::Stripe, &request)
            .await
        {
            Ok(order) => {
                tracing::info!(order_id = %order.order_id, total = %order.total_amount, "Order placed");
                let id = order.order_id.to_string();
                add_breadcrumb(
                    "checkout",
                    "Order placed",
                    Some(&[("order_id", id.as_str())]),
                );

                let store = self.store_mut();
                store.dispatch(CartAction::Clear);
                store.dispatch(AuthAction::RemoveClientSecretAndAddress);
                store.dispatch(StatusAction::IsSuccess);
                store.notify(Notice::success("Order Accepted"));
                Ok(order)
            }
            Err(e) => {
                let err = self.request_failed(e, "Payment Failed. Please try again.");
                self.store_mut()
                    .notify(Notice::error("Payment Failed. Please try again."));
                Err(err)
            }
        }
    }
}
