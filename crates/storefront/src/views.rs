//! View selection: which screen a page shows for a given state.

use rust_decimal::Decimal;

use crate::api::{Order, User};
use crate::store::{CartLine, CartState, RequestStatus};

/// Cart page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartView<'a> {
    /// "Your cart is empty" with a link back to the catalog.
    Empty,
    Items {
        lines: &'a [CartLine],
        subtotal: Decimal,
    },
}

impl<'a> CartView<'a> {
    #[must_use]
    pub fn of(cart: &'a CartState) -> Self {
        if cart.is_empty() {
            Self::Empty
        } else {
            Self::Items {
                lines: cart.lines(),
                subtotal: cart.subtotal(),
            }
        }
    }
}

/// Profile page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileView<'a> {
    LoginPrompt,
    Profile(&'a User),
}

impl<'a> ProfileView<'a> {
    #[must_use]
    pub const fn of(user: Option<&'a User>) -> Self {
        match user {
            Some(user) => Self::Profile(user),
            None => Self::LoginPrompt,
        }
    }
}

/// Order history page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdersView<'a> {
    Loading,
    Error(&'a str),
    /// "You don't have any orders yet"
    Empty,
    Orders(&'a [Order]),
}

impl<'a> OrdersView<'a> {
    #[must_use]
    pub fn of(status: &'a RequestStatus, orders: &'a [Order]) -> Self {
        if status.is_loading {
            Self::Loading
        } else if let Some(message) = status.error_message.as_deref() {
            Self::Error(message)
        } else if orders.is_empty() {
            Self::Empty
        } else {
            Self::Orders(orders)
        }
    }
}

#[cfg(test)]
mod tests {
    use bazaar_core::{ProductId, UserId};

    use super::*;

    #[test]
    fn test_cart_view_follows_line_count() {
        let mut cart = CartState::new();
        assert_eq!(CartView::of(&cart), CartView::Empty);

        cart.add_item(CartLine {
            product_id: ProductId::new(1),
            product_name: "Lamp".to_string(),
            image: String::new(),
            description: String::new(),
            price: Decimal::from(30),
            special_price: None,
            quantity: 2,
            available: 4,
        });
        match CartView::of(&cart) {
            CartView::Items { lines, subtotal } => {
                assert_eq!(lines.len(), 1);
                assert_eq!(subtotal, Decimal::from(60));
            }
            CartView::Empty => panic!("expected items"),
        }

        cart.clear();
        assert_eq!(CartView::of(&cart), CartView::Empty);
    }

    #[test]
    fn test_profile_view() {
        assert_eq!(ProfileView::of(None), ProfileView::LoginPrompt);

        let user = User {
            id: UserId::new(1),
            username: "user1".to_string(),
            email: None,
            roles: vec![],
        };
        assert_eq!(ProfileView::of(Some(&user)), ProfileView::Profile(&user));
    }

    #[test]
    fn test_orders_view() {
        let mut status = RequestStatus {
            is_loading: true,
            ..RequestStatus::default()
        };
        assert_eq!(OrdersView::of(&status, &[]), OrdersView::Loading);

        status.is_loading = false;
        assert_eq!(OrdersView::of(&status, &[]), OrdersView::Empty);

        status.error_message = Some("Failed to fetch orders".to_string());
        assert_eq!(
            OrdersView::of(&status, &[]),
            OrdersView::Error("Failed to fetch orders")
        );
    }
}
