//! Order summary shown before payment.

use bazaar_core::{PaymentMethod, ProductId, format_price_calculation};
use rust_decimal::Decimal;

use crate::api::Address;
use crate::store::{CartLine, CartState};

pub const TAX_LABEL: &str = "Tax (0%)";
const TAX_AMOUNT: &str = "$0.00";

/// One product line: `"{qty} x ${price} = ${total}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub image: String,
    pub text: String,
}

impl SummaryLine {
    fn from_cart_line(line: &CartLine) -> Self {
        let price = line.effective_price();
        Self {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            image: line.image.clone(),
            text: format!(
                "{} x ${} = ${}",
                line.quantity,
                price.normalize(),
                format_price_calculation(Decimal::from(line.quantity), price)
            ),
        }
    }
}

/// Everything the summary step displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub address: Option<Address>,
    pub payment_method: Option<PaymentMethod>,
    pub lines: Vec<SummaryLine>,
    pub products_total: String,
    pub tax: String,
    pub subtotal: String,
}

impl OrderSummary {
    #[must_use]
    pub fn new(
        cart: &CartState,
        address: Option<&Address>,
        payment_method: Option<PaymentMethod>,
    ) -> Self {
        let total = format!("${}", format_price_calculation(cart.subtotal(), Decimal::ONE));
        Self {
            address: address.cloned(),
            payment_method,
            lines: cart.lines().iter().map(SummaryLine::from_cart_line).collect(),
            products_total: total.clone(),
            tax: TAX_AMOUNT.to_string(),
            subtotal: total,
        }
    }
}

/// Label of the card form's submit button.
#[must_use]
pub fn pay_button_label(total: Decimal, ready: bool) -> String {
    if ready {
        format!("Pay ${}", format_price_calculation(total, Decimal::ONE))
    } else {
        "Processing".to_string()
    }
}
