//! Account commands: sign in and out, addresses, orders.

use bazaar_core::format_price;
use bazaar_storefront::Storefront;
use bazaar_storefront::validation::FormData;
use bazaar_storefront::views::OrdersView;

use super::CliError;

/// Sign in and persist the token.
///
/// # Errors
///
/// Returns an error for missing fields or rejected credentials.
pub async fn login(
    storefront: &mut Storefront,
    username: &str,
    password: &str,
) -> Result<(), CliError> {
    let form = FormData::new()
        .with("username", username)
        .with("password", password);

    let route = storefront.authenticate_sign_in_user(&form).await?;
    tracing::debug!(next = %route, "Signed in");
    Ok(())
}

/// Sign out; local state is cleared even if the server is unreachable.
pub async fn logout(storefront: &mut Storefront) {
    storefront.log_out_user().await;
}

/// List saved addresses.
///
/// # Errors
///
/// Returns an error when not signed in or if the request fails.
pub async fn addresses(storefront: &mut Storefront) -> Result<(), CliError> {
    storefront.get_user_addresses().await?;

    let addresses = &storefront.store().auth().addresses;
    if addresses.is_empty() {
        tracing::info!("No addresses saved");
    }
    for address in addresses {
        tracing::info!(
            id = %address.address_id,
            "{}, {}, {} {}",
            address.street,
            address.city,
            address.postcode,
            address.country
        );
    }
    Ok(())
}

/// List past orders.
///
/// # Errors
///
/// Returns an error when not signed in or if the request fails.
pub async fn orders(storefront: &mut Storefront) -> Result<(), CliError> {
    storefront.get_user_orders().await?;

    let store = storefront.store();
    match OrdersView::of(store.status(), &store.auth().orders) {
        OrdersView::Loading => {}
        OrdersView::Error(message) => tracing::warn!("{message}"),
        OrdersView::Empty => tracing::info!("You don't have any orders yet"),
        OrdersView::Orders(orders) => {
            for order in orders {
                tracing::info!(
                    id = %order.order_id,
                    date = %order.order_date,
                    status = %order.order_status,
                    items = order.order_items.len(),
                    "Total {}",
                    format_price(order.total_amount)
                );
            }
        }
    }
    Ok(())
}
