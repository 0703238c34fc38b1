//! Cart slice: the ordered list of lines the shopper intends to buy.

use bazaar_core::{CartId, ProductId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::{CartItemRequest, Product};

/// Cart operations that were refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Product not found in cart")]
    NotFound(ProductId),
    #[error("Out of stock")]
    OutOfStock(ProductId),
    #[error("Quantity Reached to Limit")]
    QuantityLimit(ProductId),
}

/// One product in the cart.
///
/// `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub image: String,
    pub description: String,
    pub price: Decimal,
    pub special_price: Option<Decimal>,
    pub quantity: u32,
    /// Stock snapshot taken when the line was added.
    pub available: u32,
}

impl CartLine {
    /// Build a line for `product` with the given quantity (at least 1).
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.product_id,
            product_name: product.product_name.clone(),
            image: product.image.clone(),
            description: product.description.clone(),
            price: product.price,
            special_price: product.special_price,
            quantity: quantity.max(1),
            available: product.quantity,
        }
    }

    /// Unit price charged: the special price, falling back to the list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.special_price.unwrap_or(self.price)
    }

    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.effective_price()
    }
}

/// Actions handled by the cart reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Merge into the line with the same product, or append.
    Add(CartLine),
    Remove(ProductId),
    Increase(ProductId),
    Decrease(ProductId),
    Clear,
    /// The cart now exists server-side under this id.
    Synced(CartId),
}

/// Cart state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    lines: Vec<CartLine>,
    cart_id: Option<CartId>,
}

impl CartState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(&mut self, action: CartAction) {
        match action {
            CartAction::Add(line) => self.add_item(line),
            CartAction::Remove(product_id) => {
                let _ = self.remove_item(product_id);
            }
            CartAction::Increase(product_id) => {
                let _ = self.increase_quantity(product_id);
            }
            CartAction::Decrease(product_id) => {
                let _ = self.decrease_quantity(product_id);
            }
            CartAction::Clear => self.clear(),
            CartAction::Synced(cart_id) => self.cart_id = Some(cart_id),
        }
    }

    /// Add a line, merging quantities when the product is already present.
    ///
    /// A merged line keeps its original price snapshot.
    pub fn add_item(&mut self, line: CartLine) {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
            existing.available = line.available;
        } else {
            self.lines.push(line);
        }
        self.cart_id = None;
    }

    /// Remove the line for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` and leaves the cart unchanged when no
    /// line matches.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<CartLine, CartError> {
        let index = self
            .lines
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or(CartError::NotFound(product_id))?;
        self.cart_id = None;
        Ok(self.lines.remove(index))
    }

    /// Increase a line's quantity by one and return the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` when no line matches.
    pub fn increase_quantity(&mut self, product_id: ProductId) -> Result<u32, CartError> {
        let line = self.line_mut(product_id)?;
        line.quantity = line.quantity.saturating_add(1);
        let quantity = line.quantity;
        self.cart_id = None;
        Ok(quantity)
    }

    /// Decrease a line's quantity by one, never below 1, and return the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` when no line matches.
    pub fn decrease_quantity(&mut self, product_id: ProductId) -> Result<u32, CartError> {
        let line = self.line_mut(product_id)?;
        if line.quantity == 1 {
            return Ok(1);
        }
        line.quantity -= 1;
        let quantity = line.quantity;
        self.cart_id = None;
        Ok(quantity)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.cart_id = None;
    }

    fn line_mut(&mut self, product_id: ProductId) -> Result<&mut CartLine, CartError> {
        self.lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or(CartError::NotFound(product_id))
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub const fn cart_id(&self) -> Option<CartId> {
        self.cart_id
    }

    /// Sum of quantity times effective price over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Number of units across all lines (the cart badge).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Lines as sent to the backend when creating the server-side cart.
    #[must_use]
    pub fn to_request(&self) -> Vec<CartItemRequest> {
        self.lines
            .iter()
            .map(|l| CartItemRequest {
                product_id: l.product_id,
                quantity: l.quantity,
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use bazaar_core::format_price;

    use super::*;

    fn line(id: i64, price: &str, special: Option<&str>, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            product_name: format!("Product {id}"),
            image: String::new(),
            description: String::new(),
            price: Decimal::from_str(price).unwrap(),
            special_price: special.map(|s| Decimal::from_str(s).unwrap()),
            quantity,
            available: 10,
        }
    }

    #[test]
    fn test_subtotal_uses_special_price() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "120", Some("100"), 1));
        cart.add_item(line(2, "50", None, 2));
        assert_eq!(format_price(cart.subtotal()), "$200.00");
    }

    #[test]
    fn test_subtotal_recomputed_after_change() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "10", None, 1));
        assert_eq!(cart.subtotal(), Decimal::from(10));
        cart.increase_quantity(ProductId::new(1)).unwrap();
        assert_eq!(cart.subtotal(), Decimal::from(20));
    }

    #[test]
    fn test_add_merges_by_product() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "10", None, 1));
        cart.add_item(line(1, "12", None, 2));

        assert_eq!(cart.lines().len(), 1);
        let merged = cart.line(ProductId::new(1)).unwrap();
        assert_eq!(merged.quantity, 3);
        assert_eq!(merged.price, Decimal::from(10));
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut cart = CartState::new();
        cart.add_item(line(2, "10", None, 1));
        cart.add_item(line(1, "10", None, 1));
        let ids: Vec<i64> = cart.lines().iter().map(|l| l.product_id.as_i64()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_decrease_clamps_at_one() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "10", None, 2));
        assert_eq!(cart.decrease_quantity(ProductId::new(1)).unwrap(), 1);
        assert_eq!(cart.decrease_quantity(ProductId::new(1)).unwrap(), 1);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 1);
    }

    #[test]
    fn test_remove_missing_leaves_cart_unchanged() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "10", None, 1));
        let before = cart.clone();

        let err = cart.remove_item(ProductId::new(99)).unwrap_err();
        assert_eq!(err, CartError::NotFound(ProductId::new(99)));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "10", None, 1));
        cart.add_item(line(2, "10", None, 1));

        let removed = cart.remove_item(ProductId::new(1)).unwrap();
        assert_eq!(removed.product_id, ProductId::new(1));
        assert_eq!(cart.lines().len(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_total_quantity() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "10", None, 2));
        cart.add_item(line(2, "10", None, 3));
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_changes_invalidate_server_cart() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "10", None, 1));
        cart.reduce(CartAction::Synced(CartId::new(5)));
        assert_eq!(cart.cart_id(), Some(CartId::new(5)));

        cart.reduce(CartAction::Increase(ProductId::new(1)));
        assert_eq!(cart.cart_id(), None);
    }

    #[test]
    fn test_to_request() {
        let mut cart = CartState::new();
        cart.add_item(line(4, "10", None, 2));
        assert_eq!(
            cart.to_request(),
            vec![CartItemRequest {
                product_id: ProductId::new(4),
                quantity: 2
            }]
        );
    }
}
