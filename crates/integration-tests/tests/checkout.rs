//! The full checkout flow against the fake backend.

#![allow(clippy::unwrap_used)]

use bazaar_core::{AddressId, PaymentMethod, ProductId};
use bazaar_integration_tests::{
    CLIENT_SECRET, FakeBackend, PASSWORD, PUBLISHABLE_KEY, USERNAME,
};
use bazaar_storefront::api::{CartItemRequest, Product};
use bazaar_storefront::checkout::{
    CheckoutError, CheckoutStep, CheckoutView, CheckoutWizard, OrderSummary,
};
use bazaar_storefront::validation::FormData;
use bazaar_storefront::{AppError, PaymentConfirmation, QueryParams, Storefront};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;

async fn signed_in(backend: &FakeBackend) -> Storefront {
    let (mut storefront, _) = backend.storefront();
    let form = FormData::new()
        .with("username", USERNAME)
        .with("password", PASSWORD);
    storefront.authenticate_sign_in_user(&form).await.unwrap();
    storefront.drain_notices();
    storefront
}

async fn search(storefront: &mut Storefront, keyword: &str) -> Vec<Product> {
    let query = QueryParams::parse(&format!("keyword={keyword}"));
    storefront.fetch_products(&query).await.unwrap();
    storefront
        .store()
        .products()
        .products
        .clone()
        .unwrap_or_default()
}

fn address_form() -> FormData {
    FormData::new()
        .with("city", "Springfield")
        .with("street", "742 Evergreen Terrace")
        .with("postcode", "49007")
        .with("country", "USA")
}

fn last_notice(storefront: &mut Storefront) -> String {
    storefront.drain_notices().pop().unwrap().message
}

#[tokio::test]
async fn test_checkout_end_to_end() {
    let backend = FakeBackend::spawn().await;
    let mut storefront = signed_in(&backend).await;

    let phones = search(&mut storefront, "phone").await;
    let phone = phones.iter().find(|p| p.product_name == "Phone").unwrap();
    let headphones = phones.iter().find(|p| p.product_name == "Headphones").unwrap();
    storefront.add_to_cart(phone, 2).unwrap();
    storefront.add_to_cart(headphones, 1).unwrap();
    storefront.drain_notices();

    // Address step
    let mut wizard = CheckoutWizard::new();
    storefront.checkout_mount(&mut wizard).await.unwrap();
    storefront.checkout_mount(&mut wizard).await.unwrap();
    assert_eq!(backend.state().addresses.len(), 0);

    let err = storefront.checkout_next(&mut wizard).await.unwrap_err();
    assert!(matches!(err, AppError::Checkout(CheckoutError::AddressRequired)));
    assert_eq!(wizard.active_step(), CheckoutStep::Address);
    assert_eq!(
        last_notice(&mut storefront),
        "Please select checkout address before proceeding."
    );

    storefront
        .add_update_user_address(&address_form(), None)
        .await
        .unwrap();
    assert_eq!(last_notice(&mut storefront), "Address saved successfully");
    assert_eq!(storefront.store().auth().addresses.len(), 1);
    assert!(!storefront.store().status().btn_loader);

    storefront
        .select_user_checkout_address(AddressId::new(1))
        .unwrap();

    // Payment method step syncs the server cart
    let step = storefront.checkout_next(&mut wizard).await.unwrap();
    assert_eq!(step, CheckoutStep::PaymentMethod);
    assert!(storefront.store().cart().cart_id().is_some());
    assert_eq!(
        backend.state().carts.clone(),
        vec![vec![
            CartItemRequest {
                product_id: ProductId::new(1),
                quantity: 2,
            },
            CartItemRequest {
                product_id: ProductId::new(2),
                quantity: 1,
            },
        ]]
    );

    let err = storefront.checkout_next(&mut wizard).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Checkout(CheckoutError::PaymentMethodRequired)
    ));
    storefront.drain_notices();

    storefront.add_payment_method(PaymentMethod::Stripe);

    // Order summary
    let step = storefront.checkout_next(&mut wizard).await.unwrap();
    assert_eq!(step, CheckoutStep::OrderSummary);
    let store = storefront.store();
    let summary = OrderSummary::new(
        store.cart(),
        store.auth().selected_checkout_address.as_ref(),
        store.payment().payment_method,
    );
    assert_eq!(summary.subtotal, "$320.00");
    assert_eq!(summary.lines[0].text, "2 x $100 = $200.00");
    assert_eq!(summary.lines[1].text, "1 x $120 = $120.00");

    // Payment
    let step = storefront.checkout_next(&mut wizard).await.unwrap();
    assert_eq!(step, CheckoutStep::Payment);
    assert_eq!(
        wizard.view(storefront.store().status()),
        CheckoutView::Step(CheckoutStep::Payment)
    );

    assert!(storefront.stripe_payment_element().is_err());

    let total = storefront.store().cart().subtotal();
    storefront.create_stripe_payment_secret(total).await.unwrap();
    assert_eq!(backend.state().secret_amounts.clone(), vec![32_000]);
    assert_eq!(
        storefront
            .store()
            .auth()
            .client_secret
            .as_ref()
            .unwrap()
            .expose_secret(),
        CLIENT_SECRET
    );

    let element = storefront.stripe_payment_element().unwrap();
    assert_eq!(element.publishable_key.expose_secret(), PUBLISHABLE_KEY);
    assert_eq!(element.client_secret.expose_secret(), CLIENT_SECRET);
    assert_eq!(
        element.return_url.as_str(),
        "https://shop.example.com/order-confirm"
    );

    let order = storefront
        .stripe_payment_confirmation(PaymentConfirmation {
            payment_id: "pi_123".to_string(),
            status: "succeeded".to_string(),
            message: "Payment successful".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(order.total_amount, Decimal::from(320));
    assert_eq!(order.payment.method(), Some(PaymentMethod::Stripe));
    assert_eq!(order.payment.pg_payment_id.as_deref(), Some("pi_123"));
    assert_eq!(last_notice(&mut storefront), "Order Accepted");

    let auth = storefront.store().auth();
    assert!(storefront.store().cart().is_empty());
    assert!(auth.client_secret.is_none());
    assert!(auth.selected_checkout_address.is_none());

    // Placing the order invalidated the cached catalog
    let phones = search(&mut storefront, "phone").await;
    let stock: Vec<_> = phones.iter().map(|p| (p.product_id, p.quantity)).collect();
    assert_eq!(stock, [(ProductId::new(1), 3), (ProductId::new(2), 2)]);

    storefront.get_user_orders().await.unwrap();
    assert_eq!(storefront.store().auth().orders.len(), 1);
}

#[tokio::test]
async fn test_changed_cart_is_synced_again() {
    let backend = FakeBackend::spawn().await;
    let mut storefront = signed_in(&backend).await;

    let phone = bazaar_integration_tests::product(1, "Phone", 100, 5);
    storefront.add_to_cart(&phone, 1).unwrap();

    storefront.enter_payment_method_step().await.unwrap();
    storefront.enter_payment_method_step().await.unwrap();
    assert_eq!(backend.state().carts.len(), 1);

    storefront.increase_cart_quantity(phone.product_id).unwrap();
    assert!(storefront.store().cart().cart_id().is_none());

    storefront.enter_payment_method_step().await.unwrap();
    assert_eq!(backend.state().carts.len(), 2);
    assert_eq!(backend.state().carts[1][0].quantity, 2);
}

#[tokio::test]
async fn test_deleting_selected_address_clears_selection() {
    let backend = FakeBackend::spawn().await;
    let mut storefront = signed_in(&backend).await;

    storefront
        .add_update_user_address(&address_form(), None)
        .await
        .unwrap();
    storefront
        .select_user_checkout_address(AddressId::new(1))
        .unwrap();

    storefront
        .delete_user_address(AddressId::new(1))
        .await
        .unwrap();

    let auth = storefront.store().auth();
    assert!(auth.addresses.is_empty());
    assert!(auth.selected_checkout_address.is_none());
}

#[tokio::test]
async fn test_update_address_in_place() {
    let backend = FakeBackend::spawn().await;
    let mut storefront = signed_in(&backend).await;

    storefront
        .add_update_user_address(&address_form(), None)
        .await
        .unwrap();

    let form = address_form().with("city", "Shelbyville");
    storefront
        .add_update_user_address(&form, Some(AddressId::new(1)))
        .await
        .unwrap();

    let addresses = &storefront.store().auth().addresses;
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].city, "Shelbyville");
}

#[tokio::test]
async fn test_incomplete_address_form() {
    let backend = FakeBackend::spawn().await;
    let mut storefront = signed_in(&backend).await;

    let form = address_form().with("postcode", "");
    let err = storefront
        .add_update_user_address(&form, None)
        .await
        .unwrap_err();

    let AppError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.get("postcode"), Some("*Postcode is required"));
    assert!(backend.state().addresses.is_empty());
}

#[tokio::test]
async fn test_quantity_limit_from_stock() {
    let backend = FakeBackend::spawn().await;
    let mut storefront = signed_in(&backend).await;

    let headphones = bazaar_integration_tests::product(2, "Headphones", 150, 3);
    storefront.add_to_cart(&headphones, 2).unwrap();

    assert_eq!(storefront.increase_cart_quantity(headphones.product_id).unwrap(), 3);
    assert!(storefront.increase_cart_quantity(headphones.product_id).is_err());
    assert_eq!(last_notice(&mut storefront), "Quantity Reached to Limit");
    assert_eq!(
        storefront.store().cart().line(headphones.product_id).unwrap().quantity,
        3
    );
}
