//! Cart actions. These are local; the server cart is created at checkout.

use bazaar_core::ProductId;
use tracing::instrument;

use crate::api::Product;
use crate::error::{AppError, add_breadcrumb};
use crate::state::Storefront;
use crate::store::{CartAction, CartError, CartLine, Notice};

impl Storefront {
    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutOfStock` when the cart would hold more units
    /// than are in stock. The cart is unchanged and an error notice is queued.
    #[instrument(skip(self, product), fields(product_id = %product.product_id))]
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) -> Result<(), AppError> {
        let quantity = quantity.max(1);
        let in_cart = self
            .store()
            .cart()
            .line(product.product_id)
            .map_or(0, |line| line.quantity);

        if in_cart.saturating_add(quantity) > product.quantity {
            return Err(self.notify_failure(CartError::OutOfStock(product.product_id), ""));
        }

        let store = self.store_mut();
        store.dispatch(CartAction::Add(CartLine::from_product(product, quantity)));
        store.notify(Notice::success("Product added to the cart"));

        let id = product.product_id.to_string();
        add_breadcrumb(
            "cart",
            "Added product",
            Some(&[("product_id", id.as_str())]),
        );
        Ok(())
    }

    /// Add one unit to a line, up to the stock seen when it was added.
    ///
    /// # Errors
    ///
    /// Returns `CartError::QuantityLimit` at the stock limit and
    /// `CartError::NotFound` for a product not in the cart.
    #[instrument(skip(self))]
    pub fn increase_cart_quantity(&mut self, product_id: ProductId) -> Result<u32, AppError> {
        let Some(line) = self.store().cart().line(product_id) else {
            return Err(self.notify_failure(CartError::NotFound(product_id), ""));
        };
        let next = line.quantity.saturating_add(1);

        if next > line.available {
            return Err(self.notify_failure(CartError::QuantityLimit(product_id), ""));
        }

        self.store_mut().dispatch(CartAction::Increase(product_id));
        Ok(next)
    }

    /// Remove one unit from a line; a line never drops below one unit.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` for a product not in the cart.
    #[instrument(skip(self))]
    pub fn decrease_cart_quantity(&mut self, product_id: ProductId) -> Result<u32, AppError> {
        if self.store().cart().line(product_id).is_none() {
            return Err(self.notify_failure(CartError::NotFound(product_id), ""));
        }

        self.store_mut().dispatch(CartAction::Decrease(product_id));
        Ok(self
            .store()
            .cart()
            .line(product_id)
            .map_or(1, |line| line.quantity))
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` (cart unchanged) for a product not in the cart.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> Result<CartLine, AppError> {
        let Some(line) = self.store().cart().line(product_id).cloned() else {
            return Err(self.notify_failure(CartError::NotFound(product_id), ""));
        };

        let store = self.store_mut();
        store.dispatch(CartAction::Remove(product_id));
        store.notify(Notice::success(format!(
            "{} removed from cart",
            line.product_name
        )));

        let id = product_id.to_string();
        add_breadcrumb(
            "cart",
            "Removed product",
            Some(&[("product_id", id.as_str())]),
        );
        Ok(line)
    }
}
